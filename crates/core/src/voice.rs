//! Voice input.

use std::fmt::{self, Display, Formatter};
use std::pin::Pin;

use museo_model::{RecognitionConfig, RecognitionError, SpeechRecognizer};

type RecognizeFuture =
    Pin<Box<dyn Future<Output = Result<String, RecognitionError>> + Send>>;

/// A user-visible notice that interrupts the conversation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Notice {
    /// The environment has no usable speech recognizer.
    VoiceUnavailable,
    /// A recognition session failed.
    VoiceError(RecognitionError),
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Notice::VoiceUnavailable => f.write_str(
                "Sorry, your environment does not support speech recognition.",
            ),
            Notice::VoiceError(err) => {
                write!(f, "Voice recognition error: {err}")
            }
        }
    }
}

pub(crate) trait RecognizerObject: Send + Sync + 'static {
    fn is_available(&self) -> bool;

    fn recognize(&self, config: &RecognitionConfig) -> RecognizeFuture;
}

pub(crate) struct AnyRecognizer<R: SpeechRecognizer>(pub R);

impl<R: SpeechRecognizer + 'static> RecognizerObject for AnyRecognizer<R> {
    #[inline]
    fn is_available(&self) -> bool {
        self.0.is_available()
    }

    #[inline]
    fn recognize(&self, config: &RecognitionConfig) -> RecognizeFuture {
        Box::pin(self.0.recognize(config))
    }
}

#[cfg(test)]
mod tests {
    use museo_test_provider::FakeSpeechRecognizer;

    use super::*;

    #[test]
    fn test_notice_text() {
        assert_eq!(
            Notice::VoiceUnavailable.to_string(),
            "Sorry, your environment does not support speech recognition."
        );
        assert_eq!(
            Notice::VoiceError(RecognitionError::new("no-speech")).to_string(),
            "Voice recognition error: no-speech"
        );
    }

    #[tokio::test]
    async fn test_erased_recognizer() {
        let recognizer: Box<dyn RecognizerObject> = Box::new(AnyRecognizer(
            FakeSpeechRecognizer::succeeding("where is the bronze gallery"),
        ));
        assert!(recognizer.is_available());
        let text = recognizer
            .recognize(&RecognitionConfig::default())
            .await
            .unwrap();
        assert_eq!(text, "where is the bronze gallery");
    }
}
