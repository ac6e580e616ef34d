use serde::Deserialize;

// ------------------------------
// Types received from the server
// ------------------------------

/// The body of a response from the ask endpoint.
///
/// Successful responses carry `answer`; some servers also report failures
/// with a JSON body carrying `error`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct AskPayload {
    pub answer: Option<String>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload() {
        let payload: AskPayload = serde_json::from_str(
            r#"{"answer":"Hi!","sources":["faq.md"]}"#,
        )
        .unwrap();
        assert_eq!(payload.answer.as_deref(), Some("Hi!"));
        assert_eq!(payload.error, None);

        let payload: AskPayload =
            serde_json::from_str(r#"{"error":"index not loaded"}"#).unwrap();
        assert_eq!(payload.answer, None);
        assert_eq!(payload.error.as_deref(), Some("index not loaded"));
    }
}
