//! An out-of-the-box museum chat widget wired to an HTTP assistant.
//!
//! The crate includes a CLI tool for chatting with the assistant in the
//! terminal. And you can also use it as a library to embed the widget and
//! its launcher into your own host apps.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod session;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`museo_core`] crate.
pub mod core {
    pub use museo_core::*;
}
