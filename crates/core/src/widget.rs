mod builder;
mod state;
#[cfg(test)]
mod tests;

use museo_actor::{Actor, ActorDeadError, Message};
use museo_model::RecognitionConfig;

use crate::assistant_client::AssistantClient;
use crate::conversation::Transcript;
use crate::render::{RenderedMessage, render_transcript};
use crate::voice::RecognizerObject;
pub use builder::WidgetBuilder;
use state::{
    RequestClose, SetOpen, StartVoiceCapture, Submit, UpdateInput,
    WidgetCallbacks,
};

/// The greeting every new transcript starts with.
pub const DEFAULT_GREETING: &str = "I'm Museo. How can I help you?";

/// Shown in place of an answer when the assistant responded with an error.
pub const SERVER_ERROR_TEXT: &str = "Error: Server responded with an error.";

/// Shown in place of an answer when the assistant could not be reached.
pub const CONNECTIVITY_ERROR_TEXT: &str =
    "Error: Unable to connect to the server.";

/// Whether the widget is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Presence {
    /// Hidden; the launcher shows the chat glyph.
    #[default]
    Closed,
    /// Shown with a live transcript.
    Open,
}

struct WidgetState {
    assistant: AssistantClient,
    recognizer: Option<Box<dyn RecognizerObject>>,
    recognition_config: RecognitionConfig,
    greeting: String,
    presence: Presence,
    // Bumped on every Closed -> Open transition, so that answers can tell
    // whether the transcript they were asked from is still current.
    session: u64,
    transcript: Transcript,
    pending_input: String,
    awaiting_answers: usize,
    callbacks: WidgetCallbacks,
}

/// A chat widget, which owns one transcript at a time and talks to the
/// assistant on the visitor's behalf.
///
/// All state lives in an actor task, so every method here just posts a
/// message and returns immediately. Messages are handled in the order they
/// were posted, and the effects of each become visible through the render
/// and notice callbacks, or through [`Widget::snapshot`].
///
/// The widget starts closed. Nothing in it ever fails outwards: network and
/// recognition failures end up in the transcript or as a [`Notice`].
///
/// [`Notice`]: crate::Notice
#[derive(Clone)]
pub struct Widget {
    handle: Actor<WidgetState>,
}

impl Widget {
    /// Sets the `open` flag of the widget.
    ///
    /// Opening a closed widget starts a new transcript holding only the
    /// greeting and clears the pending input. Closing keeps nothing.
    /// Setting the current value again does nothing.
    #[inline]
    pub fn set_open(&self, open: bool) {
        self.post(SetOpen(open));
    }

    /// Shorthand for `set_open(true)`.
    #[inline]
    pub fn open(&self) {
        self.set_open(true);
    }

    /// Shorthand for `set_open(false)`.
    #[inline]
    pub fn close(&self) {
        self.set_open(false);
    }

    /// Asks the host to close the widget, by invoking the close callback.
    ///
    /// The widget doesn't close itself. The host is expected to flip its
    /// own flag and call [`set_open`](Self::set_open).
    #[inline]
    pub fn request_close(&self) {
        self.post(RequestClose);
    }

    /// Replaces the pending input.
    #[inline]
    pub fn update_input<S: Into<String>>(&self, text: S) {
        self.post(UpdateInput(text.into()));
    }

    /// Submits the pending input to the assistant.
    ///
    /// Does nothing if the input is blank. Otherwise the input is appended
    /// to the transcript and cleared right away, and the answer (or an error
    /// message) is appended once the assistant responds. Submissions don't
    /// wait for each other.
    #[inline]
    pub fn submit(&self) {
        self.post(Submit);
    }

    /// Starts a single-shot voice capture that fills the pending input.
    #[inline]
    pub fn start_voice_capture(&self) {
        self.post(StartVoiceCapture);
    }

    /// Returns a copy of the current state, after all previously posted
    /// messages have been handled.
    pub async fn snapshot(&self) -> Result<Snapshot, ActorDeadError> {
        self.handle
            .call(|state| Snapshot {
                presence: state.presence,
                transcript: state.transcript.clone(),
                pending_input: state.pending_input.clone(),
                awaiting_answers: state.awaiting_answers,
            })
            .await
    }

    fn post<M: Message<WidgetState>>(&self, msg: M) {
        if let Err(err) = self.handle.send(msg) {
            warn!("dropping widget message: {err}");
        }
    }

    fn spawn_from_builder(builder: WidgetBuilder) -> Self {
        let WidgetBuilder {
            assistant,
            recognizer,
            recognition_config,
            greeting,
            callbacks,
        } = builder;

        let state = WidgetState {
            assistant,
            recognizer,
            recognition_config,
            greeting,
            presence: Presence::Closed,
            session: 0,
            transcript: Transcript::default(),
            pending_input: String::new(),
            awaiting_answers: 0,
            callbacks,
        };
        let handle = Actor::spawn(state, Some("widget"));
        Self { handle }
    }
}

/// A point-in-time copy of the widget state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Whether the widget is shown.
    pub presence: Presence,
    /// The current (or, when closed, the last) transcript.
    pub transcript: Transcript,
    /// The unsent input.
    pub pending_input: String,
    /// Number of submissions still waiting for the assistant.
    pub awaiting_answers: usize,
}

impl Snapshot {
    /// Renders the transcript.
    #[inline]
    pub fn rendered(&self) -> Vec<RenderedMessage> {
        render_transcript(&self.transcript)
    }
}
