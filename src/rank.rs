//! Pure top-K ranking over a chat's counters.

use std::collections::HashMap;

/// One leaderboard entry: a normalized tag and its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    /// Normalized hashtag, marker included.
    pub tag: String,
    /// Times the tag was used since the last reset.
    pub count: u64,
}

/// Rank `counts` by count descending and keep the first `k` entries.
///
/// Ties are broken lexicographically by tag so the order is deterministic
/// across runs; the counter map itself has no stable iteration order.
pub fn rank(counts: &HashMap<String, u64>, k: usize) -> Vec<TagCount> {
    if k == 0 || counts.is_empty() {
        return Vec::new();
    }
    let mut trend: Vec<TagCount> = counts
        .iter()
        .map(|(tag, count)| TagCount {
            tag: tag.clone(),
            count: *count,
        })
        .collect();
    trend.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    trend.truncate(k);
    trend
}
