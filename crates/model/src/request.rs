use serde::{Deserialize, Serialize};

/// A question to be sent to the assistant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    /// The raw text the visitor submitted.
    #[serde(rename = "question")]
    pub text: String,
}

impl Question {
    /// Creates a question from the given text.
    #[inline]
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}
