//! Cooperative shutdown signal shared between the event loop and the feeder
//! tasks. Feeders subscribe and exit when the loop signals; the broadcast
//! channel keeps the wiring one-directional.

use tokio::sync::broadcast;

#[derive(Clone)]
pub struct ShutdownHandle {
    tx: broadcast::Sender<()>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(8);
        Self { tx }
    }

    pub fn signal(&self) {
        let _ = self.tx.send(());
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }
}
