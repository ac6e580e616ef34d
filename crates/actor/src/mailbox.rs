use std::fmt::{self, Debug};

use tokio::sync::{mpsc, oneshot, watch};

use crate::{Actor, ActorDeadError};

/// Helper trait for handling boxed messages.
pub trait BoxMessage<S>: Send + Debug + 'static {
    fn handle_box(self: Box<Self>, state: &mut S, handle: &Actor<S>);
}

/// The message that an actor can handle.
pub trait Message<S>: BoxMessage<S> {
    /// Handles the message with mutable access to the actor's state.
    fn handle(self, state: &mut S, handle: &Actor<S>);
}

impl<S, M: Message<S>> BoxMessage<S> for M {
    #[inline]
    fn handle_box(self: Box<Self>, state: &mut S, handle: &Actor<S>) {
        (*self).handle(state, handle)
    }
}

/// Runs a closure against the state and replies with its result.
pub struct Call<S, T> {
    pub f: Box<dyn FnOnce(&mut S) -> T + Send>,
    pub reply_tx: oneshot::Sender<T>,
}

impl<S, T> Debug for Call<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call").finish_non_exhaustive()
    }
}

impl<S: 'static, T: Send + 'static> Message<S> for Call<S, T> {
    #[inline]
    fn handle(self, state: &mut S, _handle: &Actor<S>) {
        // The caller may have stopped waiting.
        self.reply_tx.send((self.f)(state)).ok();
    }
}

pub type MessageReceiver<S> = mpsc::UnboundedReceiver<Box<dyn BoxMessage<S>>>;

pub struct Mailbox<S> {
    msg_tx: mpsc::UnboundedSender<Box<dyn BoxMessage<S>>>,
    kill_tx: watch::Sender<bool>,
}

impl<S: Send + 'static> Mailbox<S> {
    #[inline]
    pub fn new() -> (Self, MessageReceiver<S>, watch::Receiver<bool>) {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (kill_tx, kill_rx) = watch::channel(false);
        (Mailbox { msg_tx, kill_tx }, msg_rx, kill_rx)
    }

    #[inline]
    pub fn send(
        &self,
        msg: Box<dyn BoxMessage<S>>,
    ) -> Result<(), ActorDeadError> {
        self.msg_tx.send(msg).map_err(|_| ActorDeadError)
    }

    #[inline]
    pub fn try_kill(&self) {
        self.kill_tx.send(true).ok();
    }
}
