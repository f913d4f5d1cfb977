//! Upload error types.
//!
//! The simulated transfer path has no fatal error states: malformed
//! configuration is clamped, stale ticks and unknown-id removals are
//! absorbed as no-ops. These errors exist only for the host-driven manual
//! progress surface, where silent absorption would hide real wiring bugs
//! in the host.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::UploadId;

/// Error type for host-driven upload operations.
///
/// Serializable so adapters can forward it across FFI or wire boundaries
/// without wrapping.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum UploadError {
    /// No item with the given id exists in the queue.
    #[error("No upload item with id {id}")]
    NotFound {
        /// The id that wasn't found.
        id: String,
    },

    /// A transfer clock owns the item; manual progress would race it.
    #[error("Upload {id} is driven by a transfer clock")]
    ClockActive {
        /// The id of the clock-driven item.
        id: String,
    },

    /// The item is already complete or exiting; progress is frozen.
    #[error("Upload {id} has already finished")]
    AlreadyFinished {
        /// The id of the finished item.
        id: String,
    },
}

impl UploadError {
    /// Create a not-found error.
    #[must_use]
    pub fn not_found(id: UploadId) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    /// Create a clock-active error.
    #[must_use]
    pub fn clock_active(id: UploadId) -> Self {
        Self::ClockActive { id: id.to_string() }
    }

    /// Create an already-finished error.
    #[must_use]
    pub fn already_finished(id: UploadId) -> Self {
        Self::AlreadyFinished { id: id.to_string() }
    }

    /// Check if this error means the item does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Convenience result type for upload operations.
pub type UploadResult<T> = Result<T, UploadError>;
