use serde::{Deserialize, Serialize};

/// An answer from the assistant.
///
/// The text is trusted for its content but never for its structure: it
/// may contain arbitrary markup and must be sanitized before display.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Answer {
    /// The raw answer text.
    #[serde(rename = "answer")]
    pub text: String,
}

impl Answer {
    /// Creates an answer from the given text.
    #[inline]
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}
