use std::sync::Mutex;

use tokio::sync::watch;
use tracing::info;

use crate::models::Product;
use crate::repository::{SearchRepository, SuggestionRepository};
use crate::ui_state::{StateHolder, UiState, classify, classify_suggestions};

/// Search screen: backend search, model suggestions and price comparison
pub struct SearchViewModel {
    search: SearchRepository,
    suggestions: SuggestionRepository,
    results: StateHolder<Vec<Product>>,
    suggested: StateHolder<Vec<Product>>,
    comparison: StateHolder<Vec<Product>>,
    last_query: Mutex<Option<String>>,
}

impl SearchViewModel {
    pub fn new(search: SearchRepository, suggestions: SuggestionRepository) -> Self {
        Self {
            search,
            suggestions,
            results: StateHolder::new(),
            suggested: StateHolder::new(),
            comparison: StateHolder::new(),
            last_query: Mutex::new(None),
        }
    }

    pub fn results(&self) -> watch::Receiver<UiState<Vec<Product>>> {
        self.results.subscribe()
    }

    pub fn suggestions(&self) -> watch::Receiver<UiState<Vec<Product>>> {
        self.suggested.subscribe()
    }

    pub fn comparison(&self) -> watch::Receiver<UiState<Vec<Product>>> {
        self.comparison.subscribe()
    }

    pub fn results_state(&self) -> UiState<Vec<Product>> {
        self.results.get()
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_query
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub async fn search(&self, query: &str) {
        *self.last_query.lock().unwrap_or_else(|e| e.into_inner()) = Some(query.to_string());

        let ticket = self.results.begin();
        let state = classify(self.search.search(query).await);
        info!(query, state = state.name(), "Search finished");
        self.results.finish(ticket, state);
    }

    /// Re-runs the last search, if any.
    pub async fn retry(&self) {
        if let Some(query) = self.last_query() {
            self.search(&query).await;
        }
    }

    pub async fn suggest(&self, query: &str) {
        let ticket = self.suggested.begin();
        let state = classify_suggestions(self.suggestions.suggest(query).await);
        self.suggested.finish(ticket, state);
    }

    pub async fn compare_prices(&self, query: &str) {
        let ticket = self.comparison.begin();
        let state = classify_suggestions(self.suggestions.compare_prices(query).await);
        self.comparison.finish(ticket, state);
    }

    pub fn suggestions_enabled(&self) -> bool {
        self.suggestions.is_enabled()
    }

    /// Clears the result list, e.g. when the search box is emptied. A search
    /// still in flight will not repopulate it.
    pub fn clear(&self) {
        let ticket = self.results.begin();
        self.results.finish(ticket, UiState::Idle);
    }
}
