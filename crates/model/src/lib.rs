//! An abstraction layer for the collaborators of the chat widget.
//!
//! The widget talks to two things it does not own: a remote assistant that
//! answers visitor questions, and (optionally) a speech recognizer that turns
//! the visitor's voice into text. This crate establishes the protocol for
//! both, so that the widget can be driven by a real HTTP endpoint in
//! production and by scripted fakes in tests.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;
mod speech;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
pub use speech::*;
