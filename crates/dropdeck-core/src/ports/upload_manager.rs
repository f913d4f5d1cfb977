//! Upload manager port definition.
//!
//! This port defines the public interface for the upload-queue subsystem.
//! It abstracts away all implementation details (timer tasks, cancellation
//! tokens, channel plumbing) behind a clean async API.
//!
//! # Design
//!
//! - Only core upload domain types in signatures
//! - No `CancellationToken` or channel types leak through
//! - Mutating operations that schedule deferred work take `self: Arc<Self>`
//!   so implementations can spawn tasks; this stays object-safe

use async_trait::async_trait;
use std::sync::Arc;

use crate::upload::{ChunkRange, FileSpec, QueueSnapshot, UploadId, UploadResult};

/// Configuration recognized by the upload manager.
///
/// Display-only options (`empty_message`, `auto_scroll_on_change`) have no
/// behavioral effect inside the engine; they are carried so hosts can read
/// one config object for the whole widget.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Message shown by hosts when the queue is empty. Display only.
    pub empty_message: String,
    /// Whether hosts should scroll the list on changes. Display only.
    pub auto_scroll_on_change: bool,
    /// When false, admission creates items but never starts transfer
    /// clocks; items stay `Initializing` until driven manually.
    pub simulate_transfers: bool,
    /// Inclusive range chunk counts are sampled from at admission.
    pub chunk_range: ChunkRange,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            empty_message: "Drop files to begin".to_string(),
            auto_scroll_on_change: true,
            simulate_transfers: true,
            chunk_range: ChunkRange::default(),
        }
    }
}

impl UploadConfig {
    /// Create a config with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the empty-queue message.
    #[must_use]
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Set whether hosts should auto-scroll on changes.
    #[must_use]
    pub const fn with_auto_scroll(mut self, auto_scroll: bool) -> Self {
        self.auto_scroll_on_change = auto_scroll;
        self
    }

    /// Set whether admission starts transfer clocks.
    #[must_use]
    pub const fn with_simulate_transfers(mut self, simulate: bool) -> Self {
        self.simulate_transfers = simulate;
        self
    }

    /// Set the chunk-count sampling range (clamped if invalid).
    #[must_use]
    pub const fn with_chunk_range(mut self, range: ChunkRange) -> Self {
        self.chunk_range = range;
        self
    }
}

/// Port for the upload queue engine.
///
/// This is the main interface for the subsystem. Implementations handle
/// admission, per-item progress clocks, removal grace periods, and event
/// emission internally.
///
/// # Usage
///
/// ```ignore
/// let manager: Arc<dyn UploadManagerPort> = /* ... */;
///
/// // Admit a batch of dropped files
/// let ids = Arc::clone(&manager).admit(files).await;
///
/// // User clicked the remove button
/// Arc::clone(&manager).request_removal(ids[0], true).await;
///
/// // Render
/// let snapshot = manager.snapshot().await;
/// ```
#[async_trait]
pub trait UploadManagerPort: Send + Sync {
    /// Admit a batch of files, one queue item per file, in submission
    /// order.
    ///
    /// Each item gets a fresh id and a chunk target sampled from the
    /// configured range; an `item_admitted` event is emitted synchronously
    /// per item. Returns the assigned ids in the same order as `files`.
    async fn admit(self: Arc<Self>, files: Vec<FileSpec>) -> Vec<UploadId>;

    /// Request removal of one item.
    ///
    /// Stops the item's clock if any, marks it `Exiting`, and purges it
    /// after the exit grace period, then emits `item_removed` with the
    /// given `user_initiated` flag. Unknown ids and items already exiting
    /// are silently ignored.
    async fn request_removal(self: Arc<Self>, id: UploadId, user_initiated: bool);

    /// Remove every item immediately.
    ///
    /// Stops all clocks and deletes all items with no grace period and no
    /// per-item `item_removed` notifications; bulk clear is a distinct,
    /// silent reset.
    async fn clear(&self);

    /// Host-driven progress for items admitted without simulation.
    ///
    /// Progress is monotone: values at or below the current chunk count
    /// are absorbed. Reaching the target follows the same completion path
    /// as a clock tick.
    async fn advance_manual(self: Arc<Self>, id: UploadId, completed_chunks: u32)
    -> UploadResult<()>;

    /// Get a snapshot of the current queue state, in admission order.
    async fn snapshot(&self) -> QueueSnapshot;

    /// Get the number of items currently in the queue.
    async fn item_count(&self) -> usize;

    /// Get the number of transfer clocks currently running.
    async fn active_clock_count(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = UploadConfig::default();
        assert!(config.simulate_transfers);
        assert!(config.auto_scroll_on_change);
        assert!(!config.empty_message.is_empty());
    }

    #[test]
    fn test_config_builders() {
        let config = UploadConfig::new()
            .with_empty_message("nothing here")
            .with_auto_scroll(false)
            .with_simulate_transfers(false)
            .with_chunk_range(ChunkRange::new(2, 2));

        assert_eq!(config.empty_message, "nothing here");
        assert!(!config.auto_scroll_on_change);
        assert!(!config.simulate_transfers);
        assert!(config.chunk_range.is_fixed());
    }
}
