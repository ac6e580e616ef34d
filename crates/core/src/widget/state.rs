use std::fmt::{self, Debug};

use museo_actor::{Actor, Message};
use museo_model::{ErrorKind, Question, RecognitionError};

use super::{
    CONNECTIVITY_ERROR_TEXT, Presence, SERVER_ERROR_TEXT, WidgetState,
};
use crate::Notice;
use crate::assistant_client::AskResult;
use crate::conversation::{Message as TranscriptMessage, Transcript};
use crate::render::{RenderedMessage, render_transcript};

type RenderFn = Box<dyn Fn(&[RenderedMessage]) + Send + Sync>;

#[derive(Default)]
pub(super) struct WidgetCallbacks {
    pub(super) on_render: Option<RenderFn>,
    pub(super) on_input: Option<Box<dyn Fn(&str) + Send + Sync>>,
    pub(super) on_notice: Option<Box<dyn Fn(Notice) + Send + Sync>>,
    pub(super) on_close: Option<Box<dyn Fn() + Send + Sync>>,
}

impl WidgetState {
    fn set_open(&mut self, open: bool) {
        match (self.presence, open) {
            (Presence::Closed, true) => {
                self.presence = Presence::Open;
                self.session += 1;
                self.transcript = Transcript::seeded(self.greeting.as_str());
                self.replace_pending_input(String::new());
                debug!("opened session {}", self.session);
                self.render();
            }
            (Presence::Open, false) => {
                self.presence = Presence::Closed;
                debug!("closed session {}", self.session);
            }
            _ => {
                trace!("presence unchanged: {:?}", self.presence);
            }
        }
    }

    fn submit(&mut self, handle: &Actor<Self>) {
        if self.presence != Presence::Open {
            debug!("ignoring submission while closed");
            return;
        }
        if self.pending_input.trim().is_empty() {
            trace!("ignoring blank submission");
            return;
        }

        let text = self.pending_input.clone();
        self.transcript.push(TranscriptMessage::user(text.as_str()));
        self.replace_pending_input(String::new());
        self.awaiting_answers += 1;
        self.render();

        // The answer is paired with this submission through the task, not
        // through its position in the transcript.
        let session = self.session;
        let assistant = self.assistant.clone();
        let handle = handle.clone();
        tokio::spawn(async move {
            let result = assistant.ask(Question::new(text)).await;
            handle.send(AnswerReceived { session, result }).ok();
        });
    }

    fn receive_answer(&mut self, session: u64, result: AskResult) {
        self.awaiting_answers = self.awaiting_answers.saturating_sub(1);
        if session != self.session {
            debug!("dropping an answer for discarded session {session}");
            return;
        }

        let text = match result {
            Ok(answer) => answer.text,
            Err(err) => failure_text(err.kind()).to_owned(),
        };
        self.transcript.push(TranscriptMessage::assistant(text));
        if self.presence == Presence::Open {
            self.render();
        }
    }

    fn start_voice_capture(&mut self, handle: &Actor<Self>) {
        if self.presence != Presence::Open {
            debug!("ignoring voice capture while closed");
            return;
        }
        let Some(recognizer) = self
            .recognizer
            .as_ref()
            .filter(|recognizer| recognizer.is_available())
        else {
            self.notify(Notice::VoiceUnavailable);
            return;
        };

        debug!("starting voice capture: {:?}", self.recognition_config);
        let recognition = recognizer.recognize(&self.recognition_config);
        let session = self.session;
        let handle = handle.clone();
        tokio::spawn(async move {
            let result = recognition.await;
            handle.send(VoiceCaptureFinished { session, result }).ok();
        });
    }

    fn finish_voice_capture(
        &mut self,
        session: u64,
        result: Result<String, RecognitionError>,
    ) {
        match result {
            Ok(transcript) => {
                if session != self.session || self.presence != Presence::Open
                {
                    debug!("dropping a voice transcript for a closed session");
                    return;
                }
                self.replace_pending_input(transcript);
            }
            Err(err) => {
                warn!("voice recognition failed: {err}");
                self.notify(Notice::VoiceError(err));
            }
        }
    }

    fn replace_pending_input(&mut self, text: String) {
        self.pending_input = text;
        if let Some(on_input) = &self.callbacks.on_input {
            on_input(&self.pending_input);
        }
    }

    fn render(&self) {
        if let Some(on_render) = &self.callbacks.on_render {
            on_render(&render_transcript(&self.transcript));
        }
    }

    fn notify(&self, notice: Notice) {
        if let Some(on_notice) = &self.callbacks.on_notice {
            on_notice(notice);
        }
    }
}

#[inline]
fn failure_text(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Server | ErrorKind::MalformedResponse => SERVER_ERROR_TEXT,
        ErrorKind::Connectivity => CONNECTIVITY_ERROR_TEXT,
    }
}

#[derive(Debug)]
pub(super) struct SetOpen(pub bool);

impl Message<WidgetState> for SetOpen {
    #[inline]
    fn handle(self, state: &mut WidgetState, _handle: &Actor<WidgetState>) {
        state.set_open(self.0);
    }
}

#[derive(Debug)]
pub(super) struct RequestClose;

impl Message<WidgetState> for RequestClose {
    #[inline]
    fn handle(self, state: &mut WidgetState, _handle: &Actor<WidgetState>) {
        if let Some(on_close) = &state.callbacks.on_close {
            on_close();
        }
    }
}

#[derive(Debug)]
pub(super) struct UpdateInput(pub String);

impl Message<WidgetState> for UpdateInput {
    #[inline]
    fn handle(self, state: &mut WidgetState, _handle: &Actor<WidgetState>) {
        if state.presence != Presence::Open {
            debug!("ignoring input while closed");
            return;
        }
        // Typed input is already on the host's side, so no callback.
        state.pending_input = self.0;
    }
}

#[derive(Debug)]
pub(super) struct Submit;

impl Message<WidgetState> for Submit {
    #[inline]
    fn handle(self, state: &mut WidgetState, handle: &Actor<WidgetState>) {
        state.submit(handle);
    }
}

#[derive(Debug)]
pub(super) struct StartVoiceCapture;

impl Message<WidgetState> for StartVoiceCapture {
    #[inline]
    fn handle(self, state: &mut WidgetState, handle: &Actor<WidgetState>) {
        state.start_voice_capture(handle);
    }
}

struct AnswerReceived {
    session: u64,
    result: AskResult,
}

impl Debug for AnswerReceived {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnswerReceived")
            .field("session", &self.session)
            .field("ok", &self.result.is_ok())
            .finish()
    }
}

impl Message<WidgetState> for AnswerReceived {
    #[inline]
    fn handle(self, state: &mut WidgetState, _handle: &Actor<WidgetState>) {
        state.receive_answer(self.session, self.result);
    }
}

#[derive(Debug)]
struct VoiceCaptureFinished {
    session: u64,
    result: Result<String, RecognitionError>,
}

impl Message<WidgetState> for VoiceCaptureFinished {
    #[inline]
    fn handle(self, state: &mut WidgetState, _handle: &Actor<WidgetState>) {
        state.finish_voice_capture(self.session, self.result);
    }
}
