//! tagwatch - per-chat hashtag trend engine.
//!
//! Tracks which hashtags are used most inside each chat, ranks the top-K on
//! demand, and periodically reports and clears each chat's leaderboard.
//!
//! All state is in memory and lost on restart by design. The command and
//! transport layer around a messaging platform is an external collaborator:
//! it feeds inbound messages into [`TrendRegistry::record`] and forwards the
//! before-reset reports it receives through [`TrendObserver`].

pub mod config;
pub mod extract;
pub mod rank;
pub mod report;
mod scheduler;
pub mod state;

pub use config::{ConfigError, TrendConfig};
pub use extract::EntitySpan;
pub use rank::TagCount;
pub use state::{ChatId, ChatTrendState, TrendObserver, TrendRegistry};
