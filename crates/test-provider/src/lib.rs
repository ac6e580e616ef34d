//! Local fakes of the widget's collaborators, for testing purpose.

mod preset;
mod speech;

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex};

use museo_model::{
    Answer, AssistantProvider, ErrorKind, ProviderError, Question,
};
use tokio::time::sleep;

pub use preset::*;
pub use speech::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A local fake assistant for testing purpose.
///
/// Before sending questions, you need to script how each question should be
/// answered. Questions are matched by their exact text; questions without a
/// scripted reply fall back to the default reply, or fail with a server
/// error if there is none.
///
/// Clones share the log of asked questions.
#[derive(Clone, Default)]
pub struct ScriptedAssistantProvider {
    replies: HashMap<String, PresetReply>,
    default_reply: Option<PresetReply>,
    asked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedAssistantProvider {
    #[inline]
    pub fn add_reply<S: Into<String>>(&mut self, question: S, reply: PresetReply) {
        self.replies.insert(question.into(), reply);
    }

    #[inline]
    pub fn set_default_reply(&mut self, reply: PresetReply) {
        self.default_reply = Some(reply);
    }

    /// Returns every question asked so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked
            .lock()
            .map(|asked| asked.clone())
            .unwrap_or_default()
    }
}

impl Debug for ScriptedAssistantProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedAssistantProvider")
            .field("replies", &self.replies.len())
            .field("default_reply", &self.default_reply)
            .finish_non_exhaustive()
    }
}

impl AssistantProvider for ScriptedAssistantProvider {
    type Error = crate::Error;

    fn ask(
        &self,
        question: &Question,
    ) -> impl Future<Output = Result<Answer, Self::Error>> + Send + 'static
    {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(question.text.clone());
        }
        let reply = self
            .replies
            .get(&question.text)
            .or(self.default_reply.as_ref())
            .cloned();

        async move {
            let Some(reply) = reply else {
                return Err(Error {
                    message: "no scripted reply",
                    kind: ErrorKind::Server,
                });
            };
            if let Some(delay) = reply.delay {
                sleep(delay).await;
            }
            match reply.outcome {
                PresetOutcome::Answer(text) => Ok(Answer::new(text)),
                PresetOutcome::ServerError => Err(Error {
                    message: "scripted server error",
                    kind: ErrorKind::Server,
                }),
                PresetOutcome::Unreachable => Err(Error {
                    message: "scripted connection failure",
                    kind: ErrorKind::Connectivity,
                }),
                PresetOutcome::Malformed => Err(Error {
                    message: "scripted malformed payload",
                    kind: ErrorKind::MalformedResponse,
                }),
            }
        }
    }
}
