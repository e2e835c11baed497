//! One-shot shutdown broadcast shared by every thread of a call.
//!
//! The signal is a zero-capacity channel that never carries a message. The
//! [`Trigger`] owns its only sender; dropping the trigger disconnects the
//! channel, and every `select!` waiting on [`Shutdown::signal`] wakes up at
//! once. There is no flag to poll and no lock to take.

use crate::context::Closed;
use crossbeam_channel::{Receiver, Sender, TryRecvError};

/// Fires the broadcast when dropped.
pub(crate) struct Trigger {
    _tx: Sender<Closed>,
}

impl Trigger {
    pub(crate) fn fire(self) {
        drop(self);
    }
}

/// Observer side of the broadcast. Cloned into every worker.
#[derive(Clone)]
pub(crate) struct Shutdown {
    rx: Receiver<Closed>,
}

impl Shutdown {
    /// The channel to select on. It only ever becomes ready by disconnecting.
    pub(crate) const fn signal(&self) -> &Receiver<Closed> {
        &self.rx
    }

    /// Non-blocking check used before committing to side effects.
    pub(crate) fn is_signalled(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }
}

pub(crate) fn channel() -> (Trigger, Shutdown) {
    let (tx, rx) = crossbeam_channel::bounded(0);
    (Trigger { _tx: tx }, Shutdown { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{thread, time::Duration};

    #[test]
    fn fire_wakes_all_observers() {
        let (trigger, shutdown) = channel();
        assert!(!shutdown.is_signalled());

        thread::scope(|s| {
            for _ in 0..4 {
                let shutdown = shutdown.clone();
                s.spawn(move || {
                    crossbeam_channel::select! {
                        recv(shutdown.signal()) -> msg => assert!(msg.is_err()),
                        default(Duration::from_secs(5)) => panic!("shutdown not observed"),
                    }
                });
            }
            thread::sleep(Duration::from_millis(10));
            trigger.fire();
        });

        assert!(shutdown.is_signalled());
    }
}
