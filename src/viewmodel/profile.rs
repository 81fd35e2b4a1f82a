use tokio::sync::watch;

use crate::repository::UserRepository;
use crate::settings::{SettingsStore, Theme};
use crate::ui_state::{StateHolder, UiState, classify_ack};

/// Profile screen: theme preference and account deletion
pub struct ProfileViewModel {
    users: UserRepository,
    settings: SettingsStore,
    deletion: StateHolder<()>,
    theme: watch::Sender<Theme>,
}

impl ProfileViewModel {
    pub fn new(users: UserRepository, settings: SettingsStore) -> Self {
        Self {
            users,
            settings,
            deletion: StateHolder::new(),
            theme: watch::Sender::new(Theme::default()),
        }
    }

    pub fn deletion_state(&self) -> UiState<()> {
        self.deletion.get()
    }

    pub fn theme(&self) -> watch::Receiver<Theme> {
        self.theme.subscribe()
    }

    /// Loads the stored theme; falls back to the default when unreadable.
    pub async fn load_theme(&self) -> Theme {
        let theme = self.settings.load().await.theme;
        self.theme.send_replace(theme);
        theme
    }

    pub async fn set_theme(&self, theme: Theme) -> anyhow::Result<()> {
        self.settings.save_theme(theme).await?;
        self.theme.send_replace(theme);
        Ok(())
    }

    pub async fn delete_account(&self) {
        let ticket = self.deletion.begin();
        let state = classify_ack(self.users.delete_user().await);
        self.deletion.finish(ticket, state);
    }

    pub async fn retry(&self) {
        self.delete_account().await;
    }
}
