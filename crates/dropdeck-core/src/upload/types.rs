//! Core domain types for the upload queue.
//!
//! Pure data types with no I/O dependencies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// Default lower bound for sampled chunk counts.
pub const DEFAULT_MIN_CHUNKS: u32 = 3;
/// Default upper bound for sampled chunk counts.
pub const DEFAULT_MAX_CHUNKS: u32 = 12;

/// Opaque identifier for one admitted upload item.
///
/// Generated at admission time and stable for the item's lifetime; this is
/// the sole lookup key used throughout the system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadId(Uuid);

impl UploadId {
    /// Generate a fresh unique identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UploadId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Descriptor for a file handed over by the host surface.
///
/// Captured immutably at admission; the engine never re-reads the host's
/// file object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSpec {
    /// File name as reported by the picker / drop surface.
    pub name: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME type as reported by the host (may be empty).
    pub mime_type: String,
}

impl FileSpec {
    /// Create a new file descriptor.
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
        }
    }
}

/// Lifecycle phase of an upload item.
///
/// `Initializing → Transferring → Complete → Exiting → (removed)`.
/// `Exiting` is entered from `Complete` on completion-driven removal, or
/// from any phase via explicit cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferPhase {
    /// Admitted; no progress recorded yet.
    Initializing,
    /// At least one chunk recorded, not yet at the target.
    Transferring,
    /// All chunks recorded; progress is frozen.
    Complete,
    /// Marked for removal; awaiting the exit grace period.
    Exiting,
}

impl TransferPhase {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Transferring => "transferring",
            Self::Complete => "complete",
            Self::Exiting => "exiting",
        }
    }

    /// Parse from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "transferring" => Self::Transferring,
            "complete" => Self::Complete,
            "exiting" => Self::Exiting,
            // "initializing" or unknown values default to Initializing
            _ => Self::Initializing,
        }
    }

    /// Whether a transfer clock may still drive this item.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Initializing | Self::Transferring)
    }

    /// Whether progress is frozen (`Complete` or `Exiting`).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Exiting)
    }
}

/// Inclusive range of chunk counts sampled at admission time.
///
/// Invalid bounds are corrected by clamping rather than rejected: `min` is
/// floored to 1 and `max` is floored to `min`. The engine must never fail
/// over a malformed host configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkRange {
    min: u32,
    max: u32,
}

impl ChunkRange {
    /// Create a chunk range, clamping invalid bounds.
    #[must_use]
    pub fn new(min: u32, max: u32) -> Self {
        let clamped_min = min.max(1);
        let clamped_max = max.max(clamped_min);
        if clamped_min != min || clamped_max != max {
            tracing::warn!(
                min,
                max,
                clamped_min,
                clamped_max,
                "Invalid chunk range corrected by clamping"
            );
        }
        Self {
            min: clamped_min,
            max: clamped_max,
        }
    }

    /// Lower bound (inclusive, always ≥ 1).
    #[must_use]
    pub const fn min_chunks(&self) -> u32 {
        self.min
    }

    /// Upper bound (inclusive, always ≥ `min_chunks`).
    #[must_use]
    pub const fn max_chunks(&self) -> u32 {
        self.max
    }

    /// Whether the range admits exactly one value.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        self.min == self.max
    }
}

impl Default for ChunkRange {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CHUNKS, DEFAULT_MAX_CHUNKS)
    }
}

/// A summary of one upload item (for snapshots and host rendering).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadSummary {
    /// The item's identifier.
    pub id: UploadId,
    /// File name captured at admission.
    pub name: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME type captured at admission.
    pub mime_type: String,
    /// Chunks recorded so far.
    pub completed_chunks: u32,
    /// Chunk count needed for completion.
    pub target_chunks: u32,
    /// Progress percentage (0.0 - 100.0).
    pub percentage: f64,
    /// Current lifecycle phase.
    pub phase: TransferPhase,
    /// Human-readable status derived from phase and chunk counts.
    pub status_text: String,
    /// Position in admission order (1-based).
    pub position: u32,
    /// Seconds elapsed since admission.
    pub admitted_seconds_ago: u64,
}

/// Snapshot of the entire queue state, in admission order.
///
/// This is the pull-side view for hosts; lifecycle changes are pushed via
/// [`UploadEvent`](super::UploadEvent) notifications.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct QueueSnapshot {
    /// All items currently in the queue, in admission order.
    pub items: Vec<UploadSummary>,
    /// Number of items present.
    pub item_count: u32,
    /// Number of transfer clocks currently running.
    pub active_clocks: u32,
}
