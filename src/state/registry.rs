//! Process-wide chat registry: the entry point for command handlers.

use crate::config::TrendConfig;
use crate::extract::{self, EntitySpan};
use crate::rank::TagCount;
use crate::state::{ChatId, ChatTrendState, TrendObserver};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Stands in until a real observer is registered; reports go nowhere.
struct NoopObserver;

#[async_trait::async_trait]
impl TrendObserver for NoopObserver {
    async fn on_before_reset(&self, _chat_id: ChatId, _trending: Vec<TagCount>) {}
}

/// Maps each chat to its exclusively-owned trend state.
///
/// Entries are created lazily on first activation or first recorded message
/// and live until the registry itself is dropped; dropping the registry
/// stops every chat's reset task. Lookups and insertions for different
/// chats never block each other.
pub struct TrendRegistry {
    config: TrendConfig,
    chats: DashMap<ChatId, Arc<ChatTrendState>>,
    /// Tracked-chat count, maintained separately from the map so the chat
    /// cap can be reserved atomically before inserting.
    chat_count: AtomicUsize,
    observer: OnceLock<Arc<dyn TrendObserver>>,
}

impl TrendRegistry {
    /// Create an empty registry.
    pub fn new(config: TrendConfig) -> Self {
        Self {
            config,
            chats: DashMap::new(),
            chat_count: AtomicUsize::new(0),
            observer: OnceLock::new(),
        }
    }

    /// Register the before-reset observer.
    ///
    /// Register before activating any chat: a scheduler captures the
    /// observer in place at activation time. Only the first registration
    /// takes effect; later calls are ignored.
    pub fn set_observer(&self, observer: Arc<dyn TrendObserver>) {
        if self.observer.set(observer).is_err() {
            warn!("before-reset observer already registered, ignoring");
        }
    }

    fn observer(&self) -> Arc<dyn TrendObserver> {
        self.observer
            .get()
            .cloned()
            .unwrap_or_else(|| Arc::new(NoopObserver))
    }

    /// Look up a chat, creating it lazily while the chat cap allows.
    fn entry(&self, chat_id: ChatId) -> Option<Arc<ChatTrendState>> {
        if let Some(state) = self.chats.get(&chat_id) {
            return Some(Arc::clone(state.value()));
        }
        // Reserve a slot before touching the map, so racing first-touches
        // of distinct chats cannot overshoot the cap.
        let mut tracked = self.chat_count.load(Ordering::Relaxed);
        loop {
            if tracked >= self.config.max_chats {
                warn!(chat_id, tracked, "chat cap reached, not tracking new chat");
                return None;
            }
            match self.chat_count.compare_exchange_weak(
                tracked,
                tracked + 1,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current) => tracked = current,
            }
        }
        match self.chats.entry(chat_id) {
            Entry::Occupied(occupied) => {
                // Lost a same-chat race; return the reserved slot.
                self.chat_count.fetch_sub(1, Ordering::Relaxed);
                Some(Arc::clone(occupied.get()))
            }
            Entry::Vacant(vacant) => {
                let state = Arc::new(ChatTrendState::new(chat_id, self.config.max_tags_per_chat));
                vacant.insert(Arc::clone(&state));
                Some(state)
            }
        }
    }

    /// Begin tracking a chat.
    ///
    /// `None` uses the configured default interval (24 h out of the box);
    /// `Some(Duration::ZERO)` tracks the chat with auto-reset disabled.
    pub fn activate(&self, chat_id: ChatId, interval: Option<Duration>) {
        let Some(state) = self.entry(chat_id) else {
            return;
        };
        let interval = interval.unwrap_or_else(|| self.config.reset_interval());
        info!(chat_id, interval_secs = interval.as_secs(), "chat activated");
        state.activate_auto_reset(interval, self.observer(), self.config.report_size);
    }

    /// Feed one inbound message.
    ///
    /// `spans` are pre-classified hashtag entity spans from the platform;
    /// without them the text is regex-scanned. Hashtag-free text is a no-op.
    pub fn record(&self, chat_id: ChatId, text: &str, spans: Option<&[EntitySpan]>) {
        let tags = extract::extract(text, spans);
        if tags.is_empty() {
            return;
        }
        if let Some(state) = self.entry(chat_id) {
            debug!(chat_id, tags = tags.len(), "recorded hashtags");
            state.record(&tags);
        }
    }

    /// The chat's current top `k` tags. Unknown chats yield an empty list.
    pub fn top_trending(&self, chat_id: ChatId, k: usize) -> Vec<TagCount> {
        self.chats
            .get(&chat_id)
            .map(|state| state.rank(k))
            .unwrap_or_default()
    }

    /// Clear the chat's counters now and turn auto-reset off. A no-op for
    /// unknown chats.
    pub fn reset(&self, chat_id: ChatId) {
        if let Some(state) = self.chats.get(&chat_id) {
            info!(chat_id, "explicit reset");
            state.deactivate_auto_reset();
        }
    }

    /// Number of chats currently tracked.
    pub fn len(&self) -> usize {
        self.chats.len()
    }

    /// Whether any chat is tracked yet.
    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }
}
