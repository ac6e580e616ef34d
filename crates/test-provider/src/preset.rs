use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How a scripted question is answered.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetOutcome {
    /// A successful answer with the given text.
    #[serde(rename = "answer")]
    Answer(String),
    /// The assistant responds with a non-success status.
    #[serde(rename = "server_error")]
    ServerError,
    /// The assistant can't be reached.
    #[serde(rename = "unreachable")]
    Unreachable,
    /// The assistant responds successfully with an unusable payload.
    #[serde(rename = "malformed")]
    Malformed,
}

/// The preset reply for a question.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetReply {
    /// What the assistant does.
    pub outcome: PresetOutcome,
    /// How long the assistant takes before replying.
    pub delay: Option<Duration>,
}

impl PresetReply {
    /// Creates a successful reply.
    #[inline]
    pub fn answer<S: Into<String>>(text: S) -> Self {
        Self::with_outcome(PresetOutcome::Answer(text.into()))
    }

    /// Creates a reply that fails with a server error.
    #[inline]
    pub fn server_error() -> Self {
        Self::with_outcome(PresetOutcome::ServerError)
    }

    /// Creates a reply that fails as if the assistant was unreachable.
    #[inline]
    pub fn unreachable() -> Self {
        Self::with_outcome(PresetOutcome::Unreachable)
    }

    /// Creates a reply that fails with a malformed payload.
    #[inline]
    pub fn malformed() -> Self {
        Self::with_outcome(PresetOutcome::Malformed)
    }

    /// Creates a reply with the specified outcome.
    #[inline]
    pub fn with_outcome(outcome: PresetOutcome) -> Self {
        Self {
            outcome,
            delay: None,
        }
    }

    /// Delays the reply.
    #[inline]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let replies = vec![
            PresetReply::answer("Open from <b>9:30 AM</b>.")
                .with_delay(Duration::from_millis(5)),
            PresetReply::server_error(),
            PresetReply::unreachable(),
            PresetReply::malformed(),
        ];

        let serialized = serde_json::to_string(&replies).unwrap();
        let deserialized: Vec<PresetReply> =
            serde_json::from_str(&serialized).unwrap();

        assert_eq!(replies, deserialized);
    }
}
