//! Upload manager implementation.
//!
//! This module provides the concrete implementation of `UploadManagerPort`,
//! wiring the pure queue state machine to per-item transfer clocks and the
//! event emitter.
//!
//! # Architecture
//!
//! - **Manager**: orchestrates queue, clock handles, and deferred removal
//! - **Clocks**: one cancellable task per in-flight item, reporting ticks
//!   over a channel; they never touch the queue map directly
//! - **Runner**: single long-lived task draining the tick channel, so all
//!   tick-driven mutation is serialized
//!
//! # Concurrency Model
//!
//! - Single long-lived runner (never resets `runner_started`)
//! - Per-item `CancellationToken` instead of timer-handle bookkeeping
//! - A tick in flight when its item is removed is discarded on lookup miss
//! - Lock order: queue → active (consistent everywhere)

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::{Mutex, RwLock, mpsc};
use tokio_util::sync::CancellationToken;

use dropdeck_core::ports::{UploadConfig, UploadEventEmitterPort, UploadManagerPort};
use dropdeck_core::upload::{
    ChunkRange, FileSpec, QueueSnapshot, UploadError, UploadEvent, UploadId, UploadResult,
};

use crate::clock::{TransferClock, TransferTick};
use crate::queue::{AdvanceOutcome, UploadQueue};

/// Grace period between marking an item `Exiting` and purging it, reserved
/// for the host's exit animation. Decoupled from clock timing.
pub(crate) const EXIT_GRACE: Duration = Duration::from_millis(300);

/// How long a completed item lingers before completion-driven removal
/// kicks in.
pub(crate) const COMPLETE_LINGER: Duration = Duration::from_millis(1500);

/// Handle for one item's running transfer clock.
///
/// The clock task stops itself at completion; for every other exit path
/// this token is the off switch. Cancelling is idempotent.
struct ActiveTransfer {
    cancel: CancellationToken,
}

/// Dependencies for creating an upload manager.
pub struct UploadManagerDeps<E>
where
    E: UploadEventEmitterPort + 'static,
{
    /// Port for emitting lifecycle events.
    pub event_emitter: Arc<E>,
    /// Configuration for the upload manager.
    pub config: UploadConfig,
}

/// Build an upload manager from its dependencies.
///
/// Returns an implementation of `UploadManagerPort`; callers typically wrap
/// it in `Arc` and store it as `Arc<dyn UploadManagerPort>`.
pub fn build_upload_manager<E>(deps: UploadManagerDeps<E>) -> UploadManagerImpl
where
    E: UploadEventEmitterPort + 'static,
{
    UploadManagerImpl::new(deps.event_emitter, deps.config)
}

/// Concrete implementation of the upload manager.
pub struct UploadManagerImpl {
    /// Event emitter for lifecycle notifications.
    emitter: Arc<dyn UploadEventEmitterPort>,
    /// Configuration (chunk range, simulation toggle, display options).
    config: UploadConfig,
    /// Queue state (protected by `RwLock` for async access).
    queue: RwLock<UploadQueue>,
    /// Active transfer clocks keyed by item id.
    /// Lock order: always acquire queue lock before active lock.
    active: Mutex<HashMap<UploadId, ActiveTransfer>>,
    /// Sender half handed to every spawned clock.
    tick_tx: mpsc::UnboundedSender<TransferTick>,
    /// Receiver half, taken by the runner when it starts.
    tick_rx: Mutex<Option<mpsc::UnboundedReceiver<TransferTick>>>,
    /// Whether the runner has been started (never reset for long-lived runner).
    runner_started: AtomicBool,
}

impl UploadManagerImpl {
    /// Create a new upload manager.
    fn new<E>(event_emitter: Arc<E>, config: UploadConfig) -> Self
    where
        E: UploadEventEmitterPort + 'static,
    {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();

        Self {
            emitter: event_emitter as Arc<dyn UploadEventEmitterPort>,
            config,
            queue: RwLock::new(UploadQueue::new()),
            active: Mutex::new(HashMap::new()),
            tick_tx,
            tick_rx: Mutex::new(Some(tick_rx)),
            runner_started: AtomicBool::new(false),
        }
    }

    /// Access the manager's configuration.
    pub const fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Ensure the tick runner is started.
    ///
    /// This method is idempotent: calling it multiple times has no effect
    /// after the first call. The runner runs for the lifetime of the
    /// manager.
    pub fn ensure_runner(self: &Arc<Self>) {
        if self
            .runner_started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            let manager = Arc::clone(self);
            tokio::spawn(async move {
                manager.run_loop().await;
            });
        }
    }

    /// The runner loop: drains the tick channel for the manager's lifetime.
    async fn run_loop(self: Arc<Self>) {
        let receiver = self.tick_rx.lock().await.take();
        let Some(mut rx) = receiver else {
            return;
        };
        while let Some(tick) = rx.recv().await {
            self.on_tick(tick).await;
        }
    }

    /// Apply one clock report.
    ///
    /// A report for an item that no longer exists is discarded: clock
    /// cancellation and tick delivery are not atomic with respect to each
    /// other.
    async fn on_tick(self: &Arc<Self>, tick: TransferTick) {
        let outcome =
            self.queue
                .write()
                .await
                .advance(tick.id, tick.completed_chunks, tick.is_complete);

        match outcome {
            AdvanceOutcome::Missing => {
                tracing::debug!(id = %tick.id, "Discarding tick for removed item");
            }
            AdvanceOutcome::Ignored | AdvanceOutcome::Progressed => {}
            AdvanceOutcome::JustCompleted => {
                // The clock stopped itself after this tick; drop its handle.
                self.active.lock().await.remove(&tick.id);
                tracing::info!(id = %tick.id, chunks = tick.completed_chunks, "Transfer complete");
                self.emitter.emit(UploadEvent::completed(tick.id));
                self.schedule_completion_removal(tick.id);
            }
        }
    }

    /// Schedule completion-driven removal after the linger period.
    fn schedule_completion_removal(self: &Arc<Self>, id: UploadId) {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(COMPLETE_LINGER).await;
            manager.request_removal(id, false).await;
        });
    }

    /// Purge an exiting item once its grace period has elapsed.
    ///
    /// Silent if the item vanished meanwhile (bulk clear during the grace
    /// period).
    async fn finish_removal(&self, id: UploadId, user_initiated: bool) {
        let Some(item) = self.queue.write().await.purge(id) else {
            return;
        };
        tracing::debug!(id = %id, "Upload purged");
        self.emitter
            .emit(UploadEvent::removed(id, item.file.name, user_initiated));
    }

    /// Sample a chunk target from the configured range.
    fn sample_target_chunks(range: ChunkRange) -> u32 {
        rand::thread_rng().gen_range(range.min_chunks()..=range.max_chunks())
    }
}

#[async_trait]
impl UploadManagerPort for UploadManagerImpl {
    async fn admit(self: Arc<Self>, files: Vec<FileSpec>) -> Vec<UploadId> {
        self.ensure_runner();

        let mut admitted = Vec::with_capacity(files.len());
        for file in files {
            let id = UploadId::generate();
            let target_chunks = Self::sample_target_chunks(self.config.chunk_range);
            let event =
                UploadEvent::admitted(id, &file.name, file.size, &file.mime_type, target_chunks);

            {
                // Item and clock handle appear together; lock order queue → active.
                let mut queue = self.queue.write().await;
                queue.admit(id, file, target_chunks);

                if self.config.simulate_transfers {
                    let cancel = CancellationToken::new();
                    TransferClock::spawn(id, target_chunks, self.tick_tx.clone(), cancel.clone());
                    self.active
                        .lock()
                        .await
                        .insert(id, ActiveTransfer { cancel });
                }
            }

            tracing::info!(id = %id, target_chunks, "Upload admitted");
            self.emitter.emit(event);
            admitted.push(id);
        }
        admitted
    }

    async fn request_removal(self: Arc<Self>, id: UploadId, user_initiated: bool) {
        let marked = self.queue.write().await.mark_exiting(id);
        if !marked {
            // Unknown id or already exiting; idempotent no-op.
            tracing::debug!(id = %id, user_initiated, "Removal request ignored");
            return;
        }

        if let Some(transfer) = self.active.lock().await.remove(&id) {
            transfer.cancel.cancel();
        }

        tracing::info!(id = %id, user_initiated, "Upload exiting");

        let manager = Arc::clone(&self);
        tokio::spawn(async move {
            tokio::time::sleep(EXIT_GRACE).await;
            manager.finish_removal(id, user_initiated).await;
        });
    }

    async fn clear(&self) {
        let removed = self.queue.write().await.clear();

        let mut active = self.active.lock().await;
        let stopped = active.len();
        for (_, transfer) in active.drain() {
            transfer.cancel.cancel();
        }
        drop(active);

        tracing::info!(removed, stopped, "Upload queue cleared");
    }

    async fn advance_manual(
        self: Arc<Self>,
        id: UploadId,
        completed_chunks: u32,
    ) -> UploadResult<()> {
        if self.active.lock().await.contains_key(&id) {
            return Err(UploadError::clock_active(id));
        }

        let outcome = {
            let mut queue = self.queue.write().await;
            let Some(item) = queue.get(id) else {
                return Err(UploadError::not_found(id));
            };
            if item.phase.is_terminal() {
                return Err(UploadError::already_finished(id));
            }
            let is_complete = completed_chunks >= item.target_chunks;
            queue.advance(id, completed_chunks, is_complete)
        };

        if outcome == AdvanceOutcome::JustCompleted {
            tracing::info!(id = %id, "Transfer complete (host-driven)");
            self.emitter.emit(UploadEvent::completed(id));
            self.schedule_completion_removal(id);
        }
        Ok(())
    }

    async fn snapshot(&self) -> QueueSnapshot {
        let queue = self.queue.read().await;
        let active_clocks = self.active.lock().await.len();
        #[allow(clippy::cast_possible_truncation)]
        queue.snapshot(active_clocks as u32)
    }

    async fn item_count(&self) -> usize {
        self.queue.read().await.len()
    }

    async fn active_clock_count(&self) -> usize {
        self.active.lock().await.len()
    }
}
