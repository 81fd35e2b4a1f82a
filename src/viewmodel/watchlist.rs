use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;
use tracing::info;

use crate::models::{Product, WatchListEntry};
use crate::repository::WatchlistRepository;
use crate::ui_state::{StateHolder, UiState, classify, classify_ack};
use crate::watch_duration::{self, WatchDuration};

/// Watchlist screen.
///
/// `items` holds the list; `action` reports the outcome of the last add, remove or
/// clear. Every write is followed by a reload of `items`.
pub struct WatchlistViewModel {
    repository: WatchlistRepository,
    items: StateHolder<Vec<Product>>,
    action: StateHolder<()>,
}

impl WatchlistViewModel {
    pub fn new(repository: WatchlistRepository) -> Self {
        Self {
            repository,
            items: StateHolder::new(),
            action: StateHolder::new(),
        }
    }

    pub fn items(&self) -> watch::Receiver<UiState<Vec<Product>>> {
        self.items.subscribe()
    }

    pub fn items_state(&self) -> UiState<Vec<Product>> {
        self.items.get()
    }

    pub fn action_state(&self) -> UiState<()> {
        self.action.get()
    }

    pub async fn load(&self) {
        let ticket = self.items.begin();
        let state = classify(self.repository.get().await);
        info!(state = state.name(), "Watchlist loaded");
        self.items.finish(ticket, state);
    }

    pub async fn retry(&self) {
        self.load().await;
    }

    pub async fn add(&self, product: &Product, duration: WatchDuration) {
        let ticket = self.action.begin();
        let state = classify_ack(self.repository.add(product, duration, Utc::now()).await);
        self.action.finish(ticket, state);
        self.load().await;
    }

    pub async fn remove(&self, product_name: &str) {
        let ticket = self.action.begin();
        let state = classify_ack(self.repository.remove(product_name).await);
        self.action.finish(ticket, state);
        self.load().await;
    }

    pub async fn clear(&self) {
        let ticket = self.action.begin();
        let state = classify_ack(self.repository.clear().await);
        self.action.finish(ticket, state);
        self.load().await;
    }

    /// Entries currently shown, with parsed watch-end dates.
    pub fn entries(&self) -> Vec<WatchListEntry> {
        self.items
            .get()
            .data()
            .map(|products| products.iter().map(WatchListEntry::from_product).collect())
            .unwrap_or_default()
    }

    /// Entries whose watch period ended before `now`.
    pub fn expired(&self, now: DateTime<Utc>) -> Vec<WatchListEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.watch_end.is_some_and(|end| watch_duration::is_expired(end, now)))
            .collect()
    }
}

/// Time left on `entry`'s watch, or `None` when it has no end date.
pub fn time_left(entry: &WatchListEntry, now: DateTime<Utc>) -> Option<Duration> {
    entry.watch_end.map(|end| watch_duration::remaining(end, now))
}
