use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Parameters of a single recognition session.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecognitionConfig {
    /// BCP 47 language tag, e.g. `en-US`.
    pub language: String,
    /// Whether partial transcripts should be reported while speaking.
    pub interim_results: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_owned(),
            interim_results: false,
        }
    }
}

/// An error reported by a speech recognizer.
///
/// The `code` follows the recognizer's own vocabulary (e.g. `no-speech`,
/// `not-allowed`, `network`) and is shown to the user as is.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecognitionError {
    code: String,
}

impl RecognitionError {
    /// Creates a new error with the given code.
    #[inline]
    pub fn new<S: Into<String>>(code: S) -> Self {
        Self { code: code.into() }
    }

    /// Returns the error code.
    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl Display for RecognitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl Error for RecognitionError {}

/// A speech-to-text capability of the host environment.
///
/// Each call to [`recognize`](Self::recognize) is one single-shot session:
/// it listens until the end of speech is detected and then resolves with the
/// final transcript. No manual stop is required.
pub trait SpeechRecognizer: Send + Sync {
    /// Returns whether the environment can actually recognize speech.
    ///
    /// A recognizer may be installed but unusable, e.g. when no microphone
    /// is present. Defaults to `true`.
    fn is_available(&self) -> bool {
        true
    }

    /// Starts a recognition session.
    ///
    /// The returned future must not borrow from `self` or `config`.
    fn recognize(
        &self,
        config: &RecognitionConfig,
    ) -> impl Future<Output = Result<String, RecognitionError>> + Send + 'static;
}
