use tokio::sync::watch;

use crate::models::{Product, SaveForLaterEntry};
use crate::repository::SaveForLaterRepository;
use crate::ui_state::{StateHolder, UiState, classify, classify_ack};

/// Save-for-later screen
pub struct SaveForLaterViewModel {
    repository: SaveForLaterRepository,
    items: StateHolder<Vec<SaveForLaterEntry>>,
    action: StateHolder<()>,
}

impl SaveForLaterViewModel {
    pub fn new(repository: SaveForLaterRepository) -> Self {
        Self {
            repository,
            items: StateHolder::new(),
            action: StateHolder::new(),
        }
    }

    pub fn items(&self) -> watch::Receiver<UiState<Vec<SaveForLaterEntry>>> {
        self.items.subscribe()
    }

    pub fn items_state(&self) -> UiState<Vec<SaveForLaterEntry>> {
        self.items.get()
    }

    pub fn action_state(&self) -> UiState<()> {
        self.action.get()
    }

    pub async fn load(&self) {
        let ticket = self.items.begin();
        let state = classify(self.repository.get().await);
        self.items.finish(ticket, state);
    }

    pub async fn retry(&self) {
        self.load().await;
    }

    pub async fn save(&self, product: &Product) {
        let ticket = self.action.begin();
        let entry = SaveForLaterEntry::from_product(product);
        let state = classify_ack(self.repository.add(&entry).await);
        self.action.finish(ticket, state);
        self.load().await;
    }

    pub async fn remove(&self, product_name: &str) {
        let ticket = self.action.begin();
        let state = classify_ack(self.repository.remove(product_name).await);
        self.action.finish(ticket, state);
        self.load().await;
    }
}
