//! Per-chat trend state and the process-wide registry.

mod chat;
mod observer;
mod registry;

pub use chat::ChatTrendState;
pub use observer::TrendObserver;
pub use registry::TrendRegistry;

/// Opaque 64-bit chat identifier.
pub type ChatId = i64;
