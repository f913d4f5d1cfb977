//! Upload queue state management.
//!
//! This module provides a pure state machine for the queue of admitted
//! items. No timers and no events here; the orchestrator
//! (`UploadManagerImpl`) handles both.
//!
//! # Design
//!
//! - Pure synchronous state machine (no async, no IO, no tracing)
//! - Deterministic: same inputs always produce same outputs
//! - Insertion order = display order, preserved across removals

mod item;

pub use item::QueueItem;

use indexmap::IndexMap;

use dropdeck_core::upload::{FileSpec, QueueSnapshot, TransferPhase, UploadId};

/// Outcome of applying a progress report to the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// No item with that id exists (tick in flight for a removed item).
    Missing,
    /// Progress recorded; the item is still transferring.
    Progressed,
    /// This report moved the item into `Complete`.
    JustCompleted,
    /// The item is already complete or exiting; nothing changed.
    Ignored,
}

/// Manages the upload queue state.
///
/// This is a sync type with no internal locking; the caller
/// (`UploadManagerImpl`) is responsible for synchronization.
pub struct UploadQueue {
    items: IndexMap<UploadId, QueueItem>,
}

impl UploadQueue {
    /// Create a new empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    /// Get the number of items present.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the queue is empty.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by id.
    pub fn get(&self, id: UploadId) -> Option<&QueueItem> {
        self.items.get(&id)
    }

    /// Iterate items in admission order.
    #[cfg(test)]
    pub fn items(&self) -> impl Iterator<Item = &QueueItem> {
        self.items.values()
    }

    /// Admit one file, appending it in submission order.
    ///
    /// The caller supplies the sampled `target_chunks`; ids are expected
    /// to be freshly generated and therefore unique.
    pub fn admit(&mut self, id: UploadId, file: FileSpec, target_chunks: u32) -> &QueueItem {
        debug_assert!(!self.items.contains_key(&id), "duplicate admission id");
        self.items
            .entry(id)
            .or_insert_with(|| QueueItem::new(id, file, target_chunks))
    }

    /// Apply a progress report to an item.
    ///
    /// A report for an absent item is not an error: clock cancellation and
    /// tick delivery are not atomic with respect to each other, so a tick
    /// may arrive after its item was purged.
    pub fn advance(
        &mut self,
        id: UploadId,
        completed_chunks: u32,
        is_complete: bool,
    ) -> AdvanceOutcome {
        let Some(item) = self.items.get_mut(&id) else {
            return AdvanceOutcome::Missing;
        };
        if item.phase.is_terminal() {
            return AdvanceOutcome::Ignored;
        }
        item.advance(completed_chunks, is_complete);
        if is_complete {
            AdvanceOutcome::JustCompleted
        } else {
            AdvanceOutcome::Progressed
        }
    }

    /// Mark an item as exiting.
    ///
    /// Returns `false` (leaving the queue untouched) if the item is absent
    /// or already exiting.
    pub fn mark_exiting(&mut self, id: UploadId) -> bool {
        match self.items.get_mut(&id) {
            Some(item) if item.phase != TransferPhase::Exiting => {
                item.mark_exiting();
                true
            }
            _ => false,
        }
    }

    /// Delete an item, preserving the order of the remainder.
    ///
    /// Returns the removed item so the caller can build the removal
    /// notification.
    pub fn purge(&mut self, id: UploadId) -> Option<QueueItem> {
        self.items.shift_remove(&id)
    }

    /// Delete every item. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        removed
    }

    /// Get a snapshot of the current queue state for host rendering.
    ///
    /// Positions are 1-based in admission order.
    pub fn snapshot(&self, active_clocks: u32) -> QueueSnapshot {
        // Queue sizes are always well under u32::MAX in practice
        #[allow(clippy::cast_possible_truncation)]
        let items: Vec<_> = self
            .items
            .values()
            .enumerate()
            .map(|(idx, item)| item.to_summary(idx as u32 + 1))
            .collect();

        #[allow(clippy::cast_possible_truncation)]
        QueueSnapshot {
            item_count: items.len() as u32,
            items,
            active_clocks,
        }
    }
}

impl Default for UploadQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_file(name: &str) -> FileSpec {
        FileSpec::new(name, 1024, "text/plain")
    }

    fn admit_one(queue: &mut UploadQueue, name: &str, target_chunks: u32) -> UploadId {
        let id = UploadId::generate();
        queue.admit(id, test_file(name), target_chunks);
        id
    }

    #[test]
    fn test_admit_preserves_submission_order() {
        let mut queue = UploadQueue::new();
        admit_one(&mut queue, "a", 4);
        admit_one(&mut queue, "b", 4);
        admit_one(&mut queue, "c", 4);

        let names: Vec<_> = queue.items().map(|i| i.file.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_admit_does_not_touch_existing_items() {
        let mut queue = UploadQueue::new();
        let first = admit_one(&mut queue, "a", 4);
        queue.advance(first, 2, false);

        admit_one(&mut queue, "b", 4);

        assert_eq!(queue.get(first).unwrap().completed_chunks, 2);
    }

    #[test]
    fn test_advance_missing_item() {
        let mut queue = UploadQueue::new();
        let outcome = queue.advance(UploadId::generate(), 1, false);
        assert_eq!(outcome, AdvanceOutcome::Missing);
    }

    #[test]
    fn test_advance_to_completion() {
        let mut queue = UploadQueue::new();
        let id = admit_one(&mut queue, "a", 2);

        assert_eq!(queue.advance(id, 1, false), AdvanceOutcome::Progressed);
        assert_eq!(queue.advance(id, 2, true), AdvanceOutcome::JustCompleted);
        assert_eq!(queue.get(id).unwrap().phase, TransferPhase::Complete);
    }

    #[test]
    fn test_advance_after_completion_ignored() {
        let mut queue = UploadQueue::new();
        let id = admit_one(&mut queue, "a", 2);
        queue.advance(id, 2, true);

        assert_eq!(queue.advance(id, 3, true), AdvanceOutcome::Ignored);
        assert_eq!(queue.get(id).unwrap().completed_chunks, 2);
    }

    #[test]
    fn test_advance_on_exiting_item_ignored() {
        let mut queue = UploadQueue::new();
        let id = admit_one(&mut queue, "a", 4);
        queue.advance(id, 1, false);
        queue.mark_exiting(id);

        assert_eq!(queue.advance(id, 2, false), AdvanceOutcome::Ignored);
        assert_eq!(queue.get(id).unwrap().completed_chunks, 1);
        assert_eq!(queue.get(id).unwrap().phase, TransferPhase::Exiting);
    }

    #[test]
    fn test_mark_exiting_twice_is_noop() {
        let mut queue = UploadQueue::new();
        let id = admit_one(&mut queue, "a", 4);

        assert!(queue.mark_exiting(id));
        assert!(!queue.mark_exiting(id));
    }

    #[test]
    fn test_mark_exiting_unknown_id() {
        let mut queue = UploadQueue::new();
        assert!(!queue.mark_exiting(UploadId::generate()));
    }

    #[test]
    fn test_mark_exiting_from_complete() {
        let mut queue = UploadQueue::new();
        let id = admit_one(&mut queue, "a", 2);
        queue.advance(id, 2, true);

        assert!(queue.mark_exiting(id));
        assert_eq!(queue.get(id).unwrap().phase, TransferPhase::Exiting);
    }

    #[test]
    fn test_purge_preserves_order_of_remainder() {
        let mut queue = UploadQueue::new();
        admit_one(&mut queue, "a", 4);
        let middle = admit_one(&mut queue, "b", 4);
        admit_one(&mut queue, "c", 4);

        let removed = queue.purge(middle).unwrap();
        assert_eq!(removed.file.name, "b");

        let names: Vec<_> = queue.items().map(|i| i.file.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_purge_unknown_id() {
        let mut queue = UploadQueue::new();
        assert!(queue.purge(UploadId::generate()).is_none());
    }

    #[test]
    fn test_clear() {
        let mut queue = UploadQueue::new();
        admit_one(&mut queue, "a", 4);
        admit_one(&mut queue, "b", 4);

        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_snapshot_positions() {
        let mut queue = UploadQueue::new();
        let first = admit_one(&mut queue, "a", 4);
        admit_one(&mut queue, "b", 4);
        queue.advance(first, 1, false);

        let snapshot = queue.snapshot(2);
        assert_eq!(snapshot.item_count, 2);
        assert_eq!(snapshot.active_clocks, 2);
        assert_eq!(snapshot.items[0].position, 1);
        assert_eq!(snapshot.items[0].name, "a");
        assert_eq!(snapshot.items[1].position, 2);
        assert_eq!(snapshot.items[1].name, "b");
    }
}
