use museo_core::launcher::{Launcher, LauncherGlyph};
use museo_core::render::RenderedMessage;
use museo_core::{ActorDeadError, Notice, Snapshot, Widget, WidgetBuilder};
use museo_model::{AssistantProvider, SpeechRecognizer};

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    widget_builder: WidgetBuilder,
}

impl SessionBuilder {
    /// Creates a session builder with a specified assistant provider.
    pub fn with_assistant_provider<P: AssistantProvider + 'static>(
        provider: P,
    ) -> Self {
        let widget_builder = WidgetBuilder::with_assistant_provider(provider);
        Self { widget_builder }
    }

    /// Installs a speech recognizer for voice capture.
    #[inline]
    pub fn with_speech_recognizer<R: SpeechRecognizer + 'static>(
        mut self,
        recognizer: R,
    ) -> Self {
        self.widget_builder =
            self.widget_builder.with_speech_recognizer(recognizer);
        self
    }

    /// Sets the greeting every new transcript starts with.
    #[inline]
    pub fn with_greeting<S: Into<String>>(mut self, greeting: S) -> Self {
        self.widget_builder = self.widget_builder.with_greeting(greeting);
        self
    }

    /// Attaches a callback to be invoked when the transcript is re-rendered.
    #[inline]
    pub fn on_render(
        mut self,
        on_render: impl Fn(&[RenderedMessage]) + Send + Sync + 'static,
    ) -> Self {
        self.widget_builder = self.widget_builder.on_render(on_render);
        self
    }

    /// Attaches a callback to be invoked when the widget changes the
    /// pending input.
    #[inline]
    pub fn on_input(
        mut self,
        on_input: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        self.widget_builder = self.widget_builder.on_input(on_input);
        self
    }

    /// Attaches a callback to be invoked with notices for the visitor.
    #[inline]
    pub fn on_notice(
        mut self,
        on_notice: impl Fn(Notice) + Send + Sync + 'static,
    ) -> Self {
        self.widget_builder = self.widget_builder.on_notice(on_notice);
        self
    }

    /// Attaches a callback to be invoked when the visitor asks to close the
    /// widget. The host should answer it with
    /// [`Session::set_open(false)`](Session::set_open).
    #[inline]
    pub fn on_close(
        mut self,
        on_close: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.widget_builder = self.widget_builder.on_close(on_close);
        self
    }

    /// Builds a new session, with the widget closed.
    pub fn build(self) -> Session {
        let widget = self.widget_builder.build();
        Session {
            launcher: Launcher::new(widget),
        }
    }
}

/// A chat session, like a launcher button next to a chat window that
/// displays messages and has an input box.
///
/// The session holds a launcher together with the widget it controls, and
/// it is basically a wrapper around both.
pub struct Session {
    launcher: Launcher,
}

impl Session {
    /// Returns whether the widget is shown.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.launcher.is_open()
    }

    /// Returns what the launcher should display.
    #[inline]
    pub fn glyph(&self) -> LauncherGlyph {
        self.launcher.glyph()
    }

    /// Shows or hides the widget, as if the launcher was clicked.
    #[inline]
    pub fn toggle(&mut self) {
        self.launcher.toggle();
    }

    /// Shows or hides the widget.
    #[inline]
    pub fn set_open(&mut self, open: bool) {
        self.launcher.set_open(open);
    }

    /// Replaces the pending input and submits it.
    #[inline]
    pub fn send_message(&self, message: &str) {
        let widget = self.widget();
        widget.update_input(message);
        widget.submit();
    }

    /// Submits whatever is pending, e.g. a voice transcript.
    #[inline]
    pub fn submit(&self) {
        self.widget().submit();
    }

    /// Starts a voice capture.
    #[inline]
    pub fn start_voice_capture(&self) {
        self.widget().start_voice_capture();
    }

    /// Asks the host to close the widget, through the close callback.
    #[inline]
    pub fn request_close(&self) {
        self.widget().request_close();
    }

    /// Returns a copy of the widget state.
    #[inline]
    pub async fn snapshot(&self) -> Result<Snapshot, ActorDeadError> {
        self.widget().snapshot().await
    }

    /// Returns the underlying widget.
    #[inline]
    pub fn widget(&self) -> &Widget {
        self.launcher.widget()
    }
}
