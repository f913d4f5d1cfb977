//! Signal bridge - maps host-surface signals onto upload manager calls.
//!
//! The host's drop zone, remove buttons, and clear action produce
//! [`UploadSignal`]s; the bridge drains them on its own task so senders
//! never wait for the engine. This keeps the engine decoupled from any
//! specific UI-event mechanism.

use std::sync::Arc;

use tokio::sync::mpsc;

use dropdeck_core::ports::UploadManagerPort;
use dropdeck_core::upload::{FileSpec, UploadId};

/// Inbound signal from the host surface.
#[derive(Clone, Debug)]
pub enum UploadSignal {
    /// An ordered batch of files was submitted (drop or picker).
    FilesSubmitted(Vec<FileSpec>),
    /// The user asked to remove one item.
    RemoveRequested {
        /// The item to remove.
        id: UploadId,
    },
    /// The user asked to empty the whole queue.
    ClearRequested,
}

/// Cloneable fire-and-forget sender half of the bridge.
///
/// Sends never block and never await a response; signals for a bridge that
/// has shut down are silently dropped.
#[derive(Clone)]
pub struct SignalSender {
    tx: mpsc::UnboundedSender<UploadSignal>,
}

impl SignalSender {
    /// Signal that files were submitted.
    pub fn submit_files(&self, files: Vec<FileSpec>) {
        let _ = self.tx.send(UploadSignal::FilesSubmitted(files));
    }

    /// Signal a user-initiated removal request.
    pub fn request_removal(&self, id: UploadId) {
        let _ = self.tx.send(UploadSignal::RemoveRequested { id });
    }

    /// Signal a clear request.
    pub fn request_clear(&self) {
        let _ = self.tx.send(UploadSignal::ClearRequested);
    }
}

/// Bridge task translating inbound signals into manager operations.
pub struct SignalBridge {
    tx: mpsc::UnboundedSender<UploadSignal>,
}

impl SignalBridge {
    /// Spawn the bridge's drain task over the given manager.
    ///
    /// The task runs until every [`SignalSender`] (and the bridge itself)
    /// has been dropped.
    #[must_use]
    pub fn spawn(manager: Arc<dyn UploadManagerPort>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(signal) = rx.recv().await {
                match signal {
                    UploadSignal::FilesSubmitted(files) => {
                        Arc::clone(&manager).admit(files).await;
                    }
                    UploadSignal::RemoveRequested { id } => {
                        Arc::clone(&manager).request_removal(id, true).await;
                    }
                    UploadSignal::ClearRequested => {
                        manager.clear().await;
                    }
                }
            }
            tracing::debug!("Signal bridge stopped");
        });

        Self { tx }
    }

    /// Hand out a cloneable sender for host wiring.
    #[must_use]
    pub fn sender(&self) -> SignalSender {
        SignalSender {
            tx: self.tx.clone(),
        }
    }
}
