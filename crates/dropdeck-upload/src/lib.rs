//! Upload queue engine.
//!
//! Accepts batches of file descriptors, assigns each an independent
//! simulated transfer, advances each transfer on its own clock, announces
//! lifecycle transitions through the emitter port, and removes items with
//! a grace period for exit animation. No real I/O is performed; the engine
//! exists to model upload progress for UI purposes.
//!
//! - `queue` - pure queue state machine (no timers, no events)
//! - `clock` - per-item cancellable tick tasks
//! - `manager` - orchestrator wiring queue, clocks, and events together
//! - `bridge` - inbound host signals mapped onto manager calls
//! - `bus` - broadcast fan-out implementing the emitter port

// Re-export core types for convenience
pub use dropdeck_core::ports::{
    NoopUploadEmitter, UploadConfig, UploadEventEmitterPort, UploadManagerPort,
};
pub use dropdeck_core::upload::{
    ChunkRange, FileSpec, QueueSnapshot, TransferPhase, UploadError, UploadEvent, UploadId,
    UploadResult, UploadSummary,
};

// Internal modules (pub(crate) to keep implementation private)
pub(crate) mod clock;
pub(crate) mod queue;

mod bridge;
mod bus;
mod manager;

pub use bridge::{SignalBridge, SignalSender, UploadSignal};
pub use bus::UploadEventBus;
pub use manager::{UploadManagerDeps, UploadManagerImpl, build_upload_manager};
