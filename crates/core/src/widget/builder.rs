use std::fmt::{self, Debug};

use museo_model::{AssistantProvider, RecognitionConfig, SpeechRecognizer};

use super::state::WidgetCallbacks;
use super::{DEFAULT_GREETING, Widget};
use crate::Notice;
use crate::assistant_client::AssistantClient;
use crate::render::RenderedMessage;
use crate::voice::{AnyRecognizer, RecognizerObject};

/// [`Widget`] builder.
pub struct WidgetBuilder {
    pub(super) assistant: AssistantClient,
    pub(super) recognizer: Option<Box<dyn RecognizerObject>>,
    pub(super) recognition_config: RecognitionConfig,
    pub(super) greeting: String,
    pub(super) callbacks: WidgetCallbacks,
}

impl WidgetBuilder {
    /// Creates a new builder with the specified assistant provider.
    #[inline]
    pub fn with_assistant_provider<P: AssistantProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            assistant: AssistantClient::new(provider),
            recognizer: None,
            recognition_config: RecognitionConfig::default(),
            greeting: DEFAULT_GREETING.to_owned(),
            callbacks: WidgetCallbacks::default(),
        }
    }

    /// Installs a speech recognizer. Without one, voice capture reports
    /// that it is unavailable.
    #[inline]
    pub fn with_speech_recognizer<R: SpeechRecognizer + 'static>(
        mut self,
        recognizer: R,
    ) -> Self {
        self.recognizer = Some(Box::new(AnyRecognizer(recognizer)));
        self
    }

    /// Sets the configuration used for every voice capture.
    #[inline]
    pub fn with_recognition_config(mut self, config: RecognitionConfig) -> Self {
        self.recognition_config = config;
        self
    }

    /// Sets the greeting every new transcript starts with.
    #[inline]
    pub fn with_greeting<S: Into<String>>(mut self, greeting: S) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Attaches a callback to be invoked with the rendered transcript after
    /// every change to it while the widget is open.
    ///
    /// This is where hosts re-render and scroll to the latest message.
    #[inline]
    pub fn on_render(
        mut self,
        on_render: impl Fn(&[RenderedMessage]) + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_render = Some(Box::new(on_render));
        self
    }

    /// Attaches a callback to be invoked when the widget itself changes the
    /// pending input (cleared on open and submit, filled by voice capture).
    #[inline]
    pub fn on_input(
        mut self,
        on_input: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_input = Some(Box::new(on_input));
        self
    }

    /// Attaches a callback to be invoked with notices for the visitor.
    #[inline]
    pub fn on_notice(
        mut self,
        on_notice: impl Fn(Notice) + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_notice = Some(Box::new(on_notice));
        self
    }

    /// Attaches a callback to be invoked when the visitor asks to close the
    /// widget.
    #[inline]
    pub fn on_close(
        mut self,
        on_close: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_close = Some(Box::new(on_close));
        self
    }

    /// Builds the widget.
    ///
    /// Must be called within a tokio runtime, which will drive the widget.
    #[inline]
    pub fn build(self) -> Widget {
        Widget::spawn_from_builder(self)
    }
}

impl Debug for WidgetBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetBuilder")
            .field("has_recognizer", &self.recognizer.is_some())
            .field("recognition_config", &self.recognition_config)
            .field("greeting", &self.greeting)
            .finish_non_exhaustive()
    }
}
