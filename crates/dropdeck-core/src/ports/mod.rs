//! Port definitions for the upload engine.
//!
//! Ports keep the engine host-agnostic: hosts depend on these traits, the
//! engine crate implements them, and transport details (DOM events, SSE,
//! channels) never leak into the domain.

mod event_emitter;
mod upload_manager;

pub use event_emitter::{NoopUploadEmitter, UploadEventEmitterPort};
pub use upload_manager::{UploadConfig, UploadManagerPort};
