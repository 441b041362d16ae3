//! Per-chat trend state.

use crate::rank::{self, TagCount};
use crate::scheduler::ResetScheduler;
use crate::state::{ChatId, TrendObserver};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::mem;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Hashtag counters for one chat, plus its auto-reset schedule.
///
/// The counter map is guarded by a mutex because it is hit from two
/// concurrent actors: the message-recording path and the scheduler's
/// snapshot/clear step. A reader sees either a full pre-reset snapshot or
/// the current accumulating state, never a half-cleared map.
pub struct ChatTrendState {
    chat_id: ChatId,
    /// Normalized tag -> times used. `HashMap` does not allocate until the
    /// first insert, so an idle chat carries no counter storage.
    counts: Mutex<HashMap<String, u64>>,
    /// At most one running reset task.
    scheduler: Mutex<Option<ResetScheduler>>,
    /// Distinct-tag cap; new tags past it are dropped.
    max_tags: usize,
}

impl ChatTrendState {
    pub(crate) fn new(chat_id: ChatId, max_tags: usize) -> Self {
        Self {
            chat_id,
            counts: Mutex::new(HashMap::new()),
            scheduler: Mutex::new(None),
            max_tags,
        }
    }

    /// The chat this state belongs to.
    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    /// Record one message's worth of tags. Repeats within the same call
    /// increment the counter multiple times; an empty slice is a no-op.
    pub fn record(&self, tags: &[String]) {
        if tags.is_empty() {
            return;
        }
        let mut counts = self.counts.lock();
        for tag in tags {
            if let Some(count) = counts.get_mut(tag) {
                *count += 1;
            } else if counts.len() < self.max_tags {
                counts.insert(tag.clone(), 1);
            } else {
                warn!(
                    chat_id = self.chat_id,
                    tag = %tag,
                    "tag vocabulary cap reached, dropping new tag"
                );
            }
        }
    }

    /// The current top `k` tags by count. Does not mutate state.
    pub fn rank(&self, k: usize) -> Vec<TagCount> {
        let counts = self.counts.lock();
        rank::rank(&counts, k)
    }

    /// Clear the counters without touching the schedule.
    pub(crate) fn clear(&self) {
        self.counts.lock().clear();
    }

    /// Rank the top `k` and clear the live counters in one step. The map is
    /// swapped out under the lock, so a concurrent `record` lands either
    /// fully before the snapshot or fully after the clear.
    pub(crate) fn snapshot_and_clear(&self, k: usize) -> Vec<TagCount> {
        let snapshot = mem::take(&mut *self.counts.lock());
        rank::rank(&snapshot, k)
    }

    /// Start auto-reset at `interval`, or change the period of the already
    /// running task in place. A zero interval stops any running task and
    /// starts none; explicit [`TrendRegistry::reset`] is the only reset then.
    ///
    /// [`TrendRegistry::reset`]: crate::state::TrendRegistry::reset
    pub fn activate_auto_reset(
        self: &Arc<Self>,
        interval: Duration,
        observer: Arc<dyn TrendObserver>,
        report_size: usize,
    ) {
        let mut slot = self.scheduler.lock();
        if interval.is_zero() {
            if let Some(scheduler) = slot.take() {
                scheduler.request_stop();
            }
            debug!(chat_id = self.chat_id, "auto-reset disabled");
            return;
        }
        if let Some(scheduler) = slot.as_ref() {
            if scheduler.reschedule(interval) {
                debug!(
                    chat_id = self.chat_id,
                    interval_secs = interval.as_secs(),
                    "auto-reset rearmed"
                );
                return;
            }
            // The task is gone; fall through and replace it.
        }
        *slot = Some(ResetScheduler::spawn(self, interval, observer, report_size));
        debug!(
            chat_id = self.chat_id,
            interval_secs = interval.as_secs(),
            "auto-reset armed"
        );
    }

    /// Stop the auto-reset task and clear the counters immediately.
    ///
    /// The stop is honored at the task's next wakeup; a reset already past
    /// its stop check completes its snapshot and clear, and nothing fires
    /// after that. Idempotent: a second call leaves the same end state.
    pub fn deactivate_auto_reset(&self) {
        if let Some(scheduler) = self.scheduler.lock().take() {
            scheduler.request_stop();
            debug!(chat_id = self.chat_id, "auto-reset deactivated");
        }
        self.clear();
    }
}
