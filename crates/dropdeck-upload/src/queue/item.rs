//! Queue item state (internal implementation).
//!
//! One record per admitted file. For serialization to hosts, convert to
//! `dropdeck_core::upload::UploadSummary`.

use std::time::Instant;

use dropdeck_core::upload::{FileSpec, TransferPhase, UploadId, UploadSummary};

/// The data record for one file's simulated transfer.
///
/// Mutated only by its own clock's ticks (via [`advance`](Self::advance))
/// or by the removal path (via [`mark_exiting`](Self::mark_exiting)).
#[derive(Clone, Debug)]
pub struct QueueItem {
    /// The item identifier, assigned at admission.
    pub id: UploadId,
    /// Immutable file metadata captured at admission.
    pub file: FileSpec,
    /// Chunk count needed to reach completion (≥ 1).
    pub target_chunks: u32,
    /// Chunks recorded so far; monotonically non-decreasing.
    pub completed_chunks: u32,
    /// Current lifecycle phase.
    pub phase: TransferPhase,
    /// When this item was admitted (for ordering/debugging).
    pub admitted_at: Instant,
}

impl QueueItem {
    /// Create a freshly admitted item in phase `Initializing`.
    ///
    /// A zero `target_chunks` is floored to 1 so `progress_ratio` is
    /// always defined.
    pub fn new(id: UploadId, file: FileSpec, target_chunks: u32) -> Self {
        Self {
            id,
            file,
            target_chunks: target_chunks.max(1),
            completed_chunks: 0,
            phase: TransferPhase::Initializing,
            admitted_at: Instant::now(),
        }
    }

    /// Record a progress report.
    ///
    /// `completed_chunks` never decreases and never exceeds
    /// `target_chunks`; once the item is `Complete` or `Exiting` the
    /// report is absorbed without effect.
    pub fn advance(&mut self, completed_chunks: u32, is_complete: bool) {
        if self.phase.is_terminal() {
            return;
        }
        let capped = completed_chunks.min(self.target_chunks);
        self.completed_chunks = self.completed_chunks.max(capped);
        self.phase = if is_complete {
            TransferPhase::Complete
        } else {
            TransferPhase::Transferring
        };
    }

    /// Mark the item as exiting; no other field changes.
    pub const fn mark_exiting(&mut self) {
        self.phase = TransferPhase::Exiting;
    }

    /// Progress as a ratio in `[0, 1]`.
    #[must_use]
    pub fn progress_ratio(&self) -> f64 {
        (f64::from(self.completed_chunks) / f64::from(self.target_chunks)).min(1.0)
    }

    /// Human-readable status derived from phase and chunk counts.
    #[must_use]
    pub fn status_text(&self) -> String {
        match self.phase {
            TransferPhase::Initializing => "Preparing upload".to_string(),
            TransferPhase::Transferring => format!(
                "Uploading chunk {} of {}",
                self.completed_chunks, self.target_chunks
            ),
            TransferPhase::Complete => "Upload complete".to_string(),
            TransferPhase::Exiting => "Removing".to_string(),
        }
    }

    /// Convert to a core DTO for snapshots.
    #[must_use]
    pub fn to_summary(&self, position: u32) -> UploadSummary {
        UploadSummary {
            id: self.id,
            name: self.file.name.clone(),
            size: self.file.size,
            mime_type: self.file.mime_type.clone(),
            completed_chunks: self.completed_chunks,
            target_chunks: self.target_chunks,
            percentage: self.progress_ratio() * 100.0,
            phase: self.phase,
            status_text: self.status_text(),
            position,
            admitted_seconds_ago: self.admitted_at.elapsed().as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_item(target_chunks: u32) -> QueueItem {
        QueueItem::new(
            UploadId::generate(),
            FileSpec::new("a.txt", 1024, "text/plain"),
            target_chunks,
        )
    }

    #[test]
    fn test_new_item_initializing() {
        let item = test_item(4);
        assert_eq!(item.phase, TransferPhase::Initializing);
        assert_eq!(item.completed_chunks, 0);
        assert!((item.progress_ratio()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_target_floored() {
        let item = test_item(0);
        assert_eq!(item.target_chunks, 1);
    }

    #[test]
    fn test_advance_moves_to_transferring() {
        let mut item = test_item(4);
        item.advance(1, false);
        assert_eq!(item.phase, TransferPhase::Transferring);
        assert_eq!(item.completed_chunks, 1);
    }

    #[test]
    fn test_advance_is_monotone() {
        let mut item = test_item(8);
        item.advance(5, false);
        item.advance(3, false);
        assert_eq!(item.completed_chunks, 5);
    }

    #[test]
    fn test_advance_caps_at_target() {
        let mut item = test_item(4);
        item.advance(99, false);
        assert_eq!(item.completed_chunks, 4);
    }

    #[test]
    fn test_complete_freezes_progress() {
        let mut item = test_item(2);
        item.advance(2, true);
        assert_eq!(item.phase, TransferPhase::Complete);

        item.advance(1, false);
        assert_eq!(item.phase, TransferPhase::Complete);
        assert_eq!(item.completed_chunks, 2);
    }

    #[test]
    fn test_exiting_freezes_progress() {
        let mut item = test_item(4);
        item.advance(1, false);
        item.mark_exiting();

        item.advance(3, false);
        assert_eq!(item.phase, TransferPhase::Exiting);
        assert_eq!(item.completed_chunks, 1);
    }

    #[test]
    fn test_status_text_tracks_phase() {
        let mut item = test_item(4);
        assert_eq!(item.status_text(), "Preparing upload");

        item.advance(2, false);
        assert_eq!(item.status_text(), "Uploading chunk 2 of 4");

        item.advance(4, true);
        assert_eq!(item.status_text(), "Upload complete");

        item.mark_exiting();
        assert_eq!(item.status_text(), "Removing");
    }

    #[test]
    fn test_summary_fields() {
        let mut item = test_item(4);
        item.advance(1, false);
        let summary = item.to_summary(2);

        assert_eq!(summary.id, item.id);
        assert_eq!(summary.name, "a.txt");
        assert_eq!(summary.position, 2);
        assert_eq!(summary.completed_chunks, 1);
        assert_eq!(summary.target_chunks, 4);
        assert!((summary.percentage - 25.0).abs() < 0.01);
    }
}
