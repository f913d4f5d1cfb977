//! Core domain types and port definitions for the dropdeck upload engine.
//!
//! This crate contains pure data types (items, phases, events, errors) and
//! the port traits that hosts and the engine crate implement. No I/O and no
//! runtime dependency lives here; adapters stay on the other side of the
//! ports.
#![deny(unused_crate_dependencies)]

pub mod ports;
pub mod upload;

// Re-export commonly used types for convenience
pub use ports::{NoopUploadEmitter, UploadConfig, UploadEventEmitterPort, UploadManagerPort};
pub use upload::{
    ChunkRange, FileSpec, QueueSnapshot, TransferPhase, UploadError, UploadEvent, UploadId,
    UploadResult, UploadSummary,
};
