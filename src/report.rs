//! Leaderboard message rendering.
//!
//! Pure formatting for the outbound collaborator; no transport lives here.

use crate::rank::TagCount;

/// Rank positions 0..=10 as keycap emoji.
const NUMBER_EMOJI: [&str; 11] = [
    "0\u{fe0f}\u{20e3}",
    "1\u{fe0f}\u{20e3}",
    "2\u{fe0f}\u{20e3}",
    "3\u{fe0f}\u{20e3}",
    "4\u{fe0f}\u{20e3}",
    "5\u{fe0f}\u{20e3}",
    "6\u{fe0f}\u{20e3}",
    "7\u{fe0f}\u{20e3}",
    "8\u{fe0f}\u{20e3}",
    "9\u{fe0f}\u{20e3}",
    "\u{1f51f}",
];

/// Render the trending leaderboard, or `None` when there is nothing to show.
///
/// Positions past 10 fall back to plain numbers.
pub fn render_leaderboard(trending: &[TagCount]) -> Option<String> {
    if trending.is_empty() {
        return None;
    }
    let mut msg = String::from("\u{1f525} Trending hashtag:\n\n");
    for (pos, entry) in trending.iter().enumerate() {
        let position = pos + 1;
        if position < NUMBER_EMOJI.len() {
            msg.push_str(NUMBER_EMOJI[position]);
        } else {
            msg.push_str(&position.to_string());
        }
        msg.push(' ');
        msg.push_str(&entry.tag);
        msg.push_str(" - used: ");
        msg.push_str(&entry.count.to_string());
        msg.push('\n');
    }
    Some(msg)
}
