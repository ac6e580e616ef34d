//! A lightweight single-task actor runtime.
//!
//! An actor owns its state exclusively and applies messages to it one at a
//! time, in the order they were sent. Asynchronous work is spawned as
//! separate tasks which post their results back as messages, so the state
//! is only ever touched from the actor's own task and needs no locking.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod error;
mod handle;
mod mailbox;
mod scheduler;

pub use error::ActorDeadError;
pub use handle::Actor;
pub use mailbox::Message;
