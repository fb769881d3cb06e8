//! Runs service requests off the UI thread.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
#[cfg(test)]
use std::time::Duration;
use sudoku_board::{PuzzleService, ServiceReply, ServiceRequest};
use tracing::{debug, warn};

/// One thread per request; replies come back over a channel the UI drains
/// every loop iteration.
pub struct ServiceWorker {
    service: Arc<dyn PuzzleService>,
    tx: Sender<ServiceReply>,
    rx: Receiver<ServiceReply>,
}

impl ServiceWorker {
    pub fn new(service: Arc<dyn PuzzleService>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { service, tx, rx }
    }

    pub fn backend_name(&self) -> &'static str {
        self.service.backend_name()
    }

    pub fn submit(&self, request: ServiceRequest) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let action = request.action();
        debug!(%action, "dispatching request");

        let spawned = thread::Builder::new()
            .name(format!("service-{action}"))
            .spawn(move || {
                let reply = request.execute(service.as_ref());
                // The receiver only goes away on shutdown
                let _ = tx.send(reply);
            });
        if let Err(error) = spawned {
            warn!(%action, %error, "failed to spawn service thread");
        }
    }

    /// Replies that have arrived since the last call
    pub fn drain(&self) -> Vec<ServiceReply> {
        self.rx.try_iter().collect()
    }

    /// Block for the next reply
    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ServiceReply> {
        self.rx.recv_timeout(timeout).ok()
    }
}
