//! Core logic of the museum chat widget: the HTML sanitizer, the transcript
//! model, safe rendering and the conversation controller.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod assistant_client;
pub mod conversation;
pub mod launcher;
pub mod render;
pub mod sanitizer;
mod voice;
mod widget;

pub use museo_actor::ActorDeadError;
pub use voice::Notice;
pub use widget::{
    CONNECTIVITY_ERROR_TEXT, DEFAULT_GREETING, Presence, SERVER_ERROR_TEXT,
    Snapshot, Widget, WidgetBuilder,
};
