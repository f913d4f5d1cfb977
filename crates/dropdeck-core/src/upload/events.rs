//! Upload lifecycle events - discriminated union for all outward notifications.

use serde::{Deserialize, Serialize};

use super::UploadId;

/// Single discriminated union for all upload lifecycle notifications.
///
/// The host handles this as a tagged union; delivery is fire-and-forget
/// with no acknowledgement channel. Progress itself is pull-based via
/// queue snapshots, so the event surface stays at exactly three lifecycle
/// transitions.
///
/// ```json
/// { "type": "item_admitted", "id": "…", "name": "a.txt", "size": 1024,
///   "mime_type": "text/plain", "target_chunks": 7 }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UploadEvent {
    /// An item was created from a submitted file.
    ///
    /// Carries the sampled `target_chunks` so observers can reproduce
    /// progress semantics without querying the queue.
    ItemAdmitted {
        /// Identifier assigned at admission.
        id: UploadId,
        /// File name captured at admission.
        name: String,
        /// File size in bytes.
        size: u64,
        /// MIME type captured at admission.
        mime_type: String,
        /// Chunk count needed for this item to complete.
        target_chunks: u32,
    },

    /// The tick (or manual advance) that reached the item's target.
    ItemCompleted {
        /// Identifier of the completed item.
        id: UploadId,
    },

    /// The item was purged after its exit grace period.
    ItemRemoved {
        /// Identifier of the removed item.
        id: UploadId,
        /// File name, for hosts that no longer hold the item.
        name: String,
        /// Whether removal was requested by the user (as opposed to
        /// completion-driven removal).
        user_initiated: bool,
    },
}

impl UploadEvent {
    /// Create an item-admitted event.
    pub fn admitted(
        id: UploadId,
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        target_chunks: u32,
    ) -> Self {
        Self::ItemAdmitted {
            id,
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            target_chunks,
        }
    }

    /// Create an item-completed event.
    #[must_use]
    pub const fn completed(id: UploadId) -> Self {
        Self::ItemCompleted { id }
    }

    /// Create an item-removed event.
    pub fn removed(id: UploadId, name: impl Into<String>, user_initiated: bool) -> Self {
        Self::ItemRemoved {
            id,
            name: name.into(),
            user_initiated,
        }
    }

    /// Get the item id carried by any event type.
    #[must_use]
    pub const fn id(&self) -> UploadId {
        match self {
            Self::ItemAdmitted { id, .. }
            | Self::ItemCompleted { id }
            | Self::ItemRemoved { id, .. } => *id,
        }
    }

    /// Get the event name for wire protocols.
    ///
    /// Provides consistent channel naming for DOM-event, SSE, or websocket
    /// transports; payload differentiation happens via the type tag.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::ItemAdmitted { .. } => "upload:item_admitted",
            Self::ItemCompleted { .. } => "upload:item_completed",
            Self::ItemRemoved { .. } => "upload:item_removed",
        }
    }
}
