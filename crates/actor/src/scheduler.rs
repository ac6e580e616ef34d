use std::sync::Weak;

use tokio::select;
use tokio::sync::watch;

use crate::Actor;
use crate::mailbox::{Mailbox, MessageReceiver};

pub async fn run_actor<S: Send + 'static>(
    mailbox: Weak<Mailbox<S>>,
    mut state: S,
    mut msg_rx: MessageReceiver<S>,
    mut kill_rx: watch::Receiver<bool>,
) {
    debug!("started");
    loop {
        let msg = select! {
            biased;

            _ = kill_rx.changed() => {
                break;
            }
            msg = msg_rx.recv() => {
                let Some(msg) = msg else {
                    break;
                };
                msg
            }
        };
        trace!("received message: {msg:?}");

        let Some(mailbox) = mailbox.upgrade() else {
            warn!("all handles have been dropped, discard the message");
            break;
        };
        let handle = Actor::from_mailbox(mailbox);
        trace_span!("proc msg").in_scope(|| {
            msg.handle_box(&mut state, &handle);
        });
    }
    debug!("will terminate");
}
