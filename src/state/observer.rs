//! Observer seam between the scheduler and the outbound layer.

use crate::rank::TagCount;
use crate::state::ChatId;
use async_trait::async_trait;

/// Receives each chat's leaderboard just before an automatic reset.
///
/// Invoked as a detached task: the reset does not wait for it, and a failed
/// or hung observer cannot disturb the reset cadence.
#[async_trait]
pub trait TrendObserver: Send + Sync {
    /// Called with the ranked top entries immediately before the counters
    /// are cleared. `trending` may be empty; the receiver decides whether an
    /// empty board is worth forwarding.
    async fn on_before_reset(&self, chat_id: ChatId, trending: Vec<TagCount>);
}
