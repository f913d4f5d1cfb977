//! Transfer clock - per-item periodic driver of simulated progress.
//!
//! One cancellable task per in-flight item. The clock owns nothing but its
//! counter: it reports ticks to the manager's runner over a channel and
//! never touches the queue map or the emitter.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use dropdeck_core::upload::UploadId;

/// Interval between simulated progress ticks.
///
/// Fixed for every item: not scaled to file size or chunk count.
pub(crate) const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// One progress report from a transfer clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TransferTick {
    /// The item this clock drives.
    pub id: UploadId,
    /// Ticks elapsed so far; increments by exactly 1 per tick.
    pub completed_chunks: u32,
    /// Whether this tick reached the item's chunk target.
    pub is_complete: bool,
}

pub(crate) struct TransferClock;

impl TransferClock {
    /// Spawn the clock task for one item.
    ///
    /// Each tick increments a local counter by 1 and reports it; after
    /// reporting `is_complete = true` the task exits on its own and no
    /// further ticks are emitted. Cancelling the token stops the task
    /// before its next tick; a tick already sent may still be delivered
    /// and is discarded by the runner's lookup-miss rule.
    pub fn spawn(
        id: UploadId,
        target_chunks: u32,
        tick_tx: mpsc::UnboundedSender<TransferTick>,
        cancel: CancellationToken,
    ) {
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + TICK_INTERVAL;
            let mut tick = tokio::time::interval_at(start, TICK_INTERVAL);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

            let mut counter = 0u32;

            loop {
                tokio::select! {
                    biased;

                    () = cancel.cancelled() => {
                        tracing::debug!(id = %id, at = counter, "Transfer clock cancelled");
                        break;
                    }

                    _ = tick.tick() => {
                        counter += 1;
                        let is_complete = counter >= target_chunks;
                        let report = TransferTick {
                            id,
                            completed_chunks: counter,
                            is_complete,
                        };
                        if tick_tx.send(report).is_err() {
                            // Runner gone; nothing left to report to.
                            break;
                        }
                        if is_complete {
                            break;
                        }
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_count_up_and_stop_at_target() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = UploadId::generate();
        TransferClock::spawn(id, 3, tx, CancellationToken::new());

        for expected in 1..=3u32 {
            let tick = rx.recv().await.unwrap();
            assert_eq!(tick.id, id);
            assert_eq!(tick.completed_chunks, expected);
            assert_eq!(tick.is_complete, expected == 3);
        }

        // Task exited after completion; sender side is closed.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        TransferClock::spawn(UploadId::generate(), 100, tx, cancel.clone());

        let first = rx.recv().await.unwrap();
        assert_eq!(first.completed_chunks, 1);

        cancel.cancel();

        // At most one tick can already be in flight; after that the
        // channel closes without reaching the target.
        let mut extra = 0;
        while let Some(tick) = rx.recv().await {
            assert!(!tick.is_complete);
            extra += 1;
        }
        assert!(extra <= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_first_tick() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        TransferClock::spawn(UploadId::generate(), 5, tx, cancel.clone());

        cancel.cancel();

        assert!(rx.recv().await.is_none());
    }
}
