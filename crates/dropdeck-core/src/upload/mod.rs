//! Upload domain types.
//!
//! Pure data types with no I/O dependencies. The engine crate
//! (`dropdeck-upload`) owns all timers and state mutation; everything here
//! is safe to serialize across adapter boundaries.

mod errors;
mod events;
mod types;

pub use errors::{UploadError, UploadResult};
pub use events::UploadEvent;
pub use types::{
    ChunkRange, DEFAULT_MAX_CHUNKS, DEFAULT_MIN_CHUNKS, FileSpec, QueueSnapshot, TransferPhase,
    UploadId, UploadSummary,
};
