//! Periodic auto-reset task.
//!
//! One recurring task per activated chat. Each tick snapshots and clears the
//! chat's counters, handing the ranked snapshot to the observer as a detached
//! task. Loss of a single report is acceptable; loss of the reset cadence is
//! not.

use crate::state::{ChatTrendState, TrendObserver};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Control handle for a running reset task.
///
/// The task holds only a [`Weak`](std::sync::Weak) reference to its chat
/// state, so the state (which owns this handle) can actually be dropped.
/// Dropping the handle closes the period channel, which the task treats as
/// a stop signal; this is how registry teardown ends every task.
pub(crate) struct ResetScheduler {
    period_tx: watch::Sender<Duration>,
    stop: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl ResetScheduler {
    /// Spawn the recurring reset task for `state`.
    pub(crate) fn spawn(
        state: &Arc<ChatTrendState>,
        period: Duration,
        observer: Arc<dyn TrendObserver>,
        report_size: usize,
    ) -> Self {
        let chat_id = state.chat_id();
        let state = Arc::downgrade(state);
        let (period_tx, mut period_rx) = watch::channel(period);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let task = tokio::spawn(async move {
            let mut ticker = next_ticker(period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // A stop raised during the wait ends the task
                        // without firing; swap() consumes the request.
                        if stop_flag.swap(false, Ordering::SeqCst) {
                            debug!(chat_id, "auto-reset task stopped");
                            break;
                        }
                        // The registry is the only long-lived owner of the
                        // state; if it is gone the chat was torn down.
                        let Some(state) = state.upgrade() else {
                            break;
                        };
                        fire(&state, &observer, report_size);
                    }
                    changed = period_rx.changed() => {
                        if changed.is_err() {
                            // Handle dropped: the chat is being torn down.
                            break;
                        }
                        let period = *period_rx.borrow_and_update();
                        debug!(
                            chat_id,
                            period_secs = period.as_secs(),
                            "auto-reset rescheduled"
                        );
                        ticker = next_ticker(period);
                    }
                }
            }
        });

        Self {
            period_tx,
            stop,
            task,
        }
    }

    /// Change the period of the running task without restarting it.
    ///
    /// Returns `false` if the task has already exited and must be respawned.
    pub(crate) fn reschedule(&self, period: Duration) -> bool {
        !self.task.is_finished() && self.period_tx.send(period).is_ok()
    }

    /// Ask the task to stop at its next wakeup.
    ///
    /// A tick already past its stop check completes its snapshot and clear
    /// first; no reset fires after that.
    pub(crate) fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

/// Build a ticker whose first fire is one full period away. A plain
/// `interval()` fires immediately, which would reset right at activation.
fn next_ticker(period: Duration) -> tokio::time::Interval {
    tokio::time::interval_at(tokio::time::Instant::now() + period, period)
}

/// Snapshot and clear the counters, then hand the ranked snapshot to the
/// observer without awaiting it.
fn fire(state: &Arc<ChatTrendState>, observer: &Arc<dyn TrendObserver>, report_size: usize) {
    let trending = state.snapshot_and_clear(report_size);
    debug!(
        chat_id = state.chat_id(),
        entries = trending.len(),
        "auto-reset fired"
    );
    let observer = Arc::clone(observer);
    let chat_id = state.chat_id();
    tokio::spawn(async move {
        observer.on_before_reset(chat_id, trending).await;
    });
}
