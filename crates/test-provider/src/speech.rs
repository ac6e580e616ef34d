use std::sync::{Arc, Mutex};
use std::time::Duration;

use museo_model::{RecognitionConfig, RecognitionError, SpeechRecognizer};
use tokio::time::sleep;

#[derive(Clone, Debug)]
enum FakeRecognition {
    Transcript(String),
    Failure(String),
    Unavailable,
}

/// A local fake speech recognizer for testing purpose.
///
/// Clones share the log of started sessions.
#[derive(Clone, Debug)]
pub struct FakeSpeechRecognizer {
    recognition: FakeRecognition,
    delay: Duration,
    started_with: Arc<Mutex<Vec<RecognitionConfig>>>,
}

impl FakeSpeechRecognizer {
    fn new(recognition: FakeRecognition) -> Self {
        Self {
            recognition,
            delay: Duration::from_millis(1),
            started_with: Default::default(),
        }
    }

    /// Creates a recognizer that always hears `transcript`.
    #[inline]
    pub fn succeeding<S: Into<String>>(transcript: S) -> Self {
        Self::new(FakeRecognition::Transcript(transcript.into()))
    }

    /// Creates a recognizer that always fails with `code`.
    #[inline]
    pub fn failing<S: Into<String>>(code: S) -> Self {
        Self::new(FakeRecognition::Failure(code.into()))
    }

    /// Creates a recognizer that reports itself as unavailable.
    #[inline]
    pub fn unavailable() -> Self {
        Self::new(FakeRecognition::Unavailable)
    }

    /// Sets how long each session takes.
    #[inline]
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Returns the configs of all sessions started so far.
    pub fn started_with(&self) -> Vec<RecognitionConfig> {
        self.started_with
            .lock()
            .map(|started| started.clone())
            .unwrap_or_default()
    }
}

impl SpeechRecognizer for FakeSpeechRecognizer {
    fn is_available(&self) -> bool {
        !matches!(self.recognition, FakeRecognition::Unavailable)
    }

    fn recognize(
        &self,
        config: &RecognitionConfig,
    ) -> impl Future<Output = Result<String, RecognitionError>> + Send + 'static
    {
        if let Ok(mut started) = self.started_with.lock() {
            started.push(config.clone());
        }
        let recognition = self.recognition.clone();
        let delay = self.delay;
        async move {
            sleep(delay).await;
            match recognition {
                FakeRecognition::Transcript(text) => Ok(text),
                FakeRecognition::Failure(code) => {
                    Err(RecognitionError::new(code))
                }
                FakeRecognition::Unavailable => {
                    Err(RecognitionError::new("not-allowed"))
                }
            }
        }
    }
}
