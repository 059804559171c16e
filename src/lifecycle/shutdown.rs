//! Stop signal shared by the accept loop and the datagram receive loop.

use tokio::sync::broadcast;

/// Fan-out stop signal for server loops.
///
/// Each loop holds its own receiver; `trigger` wakes all of them at once.
/// A trigger with no subscribers is not remembered.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscribed loop to stop.
    pub fn trigger(&self) {
        if self.tx.send(()).is_err() {
            tracing::debug!("Shutdown triggered with no running loops");
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
