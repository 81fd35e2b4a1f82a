use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{info, warn};

use crate::auth::{RetryingTokenProvider, StaticTokenProvider};
use crate::config::Config;
use crate::navigation::{Navigator, Route};
use crate::remote::HttpRemote;
use crate::repository::{
    AuthRepository, SaveForLaterRepository, SearchRepository, SuggestionRepository,
    UserRepository, WatchlistRepository,
};
use crate::settings::SettingsStore;
use crate::suggestion::{GeminiModel, SuggestionAdapter};
use crate::traits::{RemoteApi, TokenProvider};
use crate::viewmodel::{
    LoginViewModel, ProfileViewModel, SaveForLaterViewModel, ScreenScope, SearchViewModel,
    WatchlistViewModel,
};

const TOKEN_REFRESH_ATTEMPTS: u32 = 3;
const TOKEN_REFRESH_BACKOFF: Duration = Duration::from_millis(250);

/// Wires repositories and view-models together and owns navigation.
///
/// Moving to a screen cancels the previous screen's tasks and starts the new
/// screen's initial load.
///
/// Screen loads run on the Tokio runtime that was current when the tracker was
/// built, so [`navigate`](Self::navigate) and [`back`](Self::back) may be called
/// from any thread. A tracker built outside a runtime starts loads only when
/// navigation happens inside one; otherwise the load is skipped with a warning.
#[derive(Clone)]
pub struct DealTracker {
    pub login: Arc<LoginViewModel>,
    pub search: Arc<SearchViewModel>,
    pub watchlist: Arc<WatchlistViewModel>,
    pub saved: Arc<SaveForLaterViewModel>,
    pub profile: Arc<ProfileViewModel>,
    navigator: Arc<Mutex<Navigator>>,
    scope: Arc<Mutex<ScreenScope>>,
}

impl DealTracker {
    pub fn new(config: &Config) -> Result<Self> {
        let remote = Arc::new(HttpRemote::new(&config.api_url)?);
        let tokens = Arc::new(RetryingTokenProvider::new(
            StaticTokenProvider::new(config.id_token.clone()),
            TOKEN_REFRESH_ATTEMPTS,
            TOKEN_REFRESH_BACKOFF,
        ));
        let adapter = match &config.gemini_api_key {
            Some(key) => SuggestionAdapter::new(Arc::new(GeminiModel::new(
                key.clone(),
                config.gemini_model.clone(),
            )?)),
            None => SuggestionAdapter::disabled(),
        };

        info!("Using backend at {}", config.api_url);
        Ok(Self::from_parts(
            remote,
            tokens,
            adapter,
            SettingsStore::new(config.settings_path.clone()),
            config.nav_cooldown,
        ))
    }

    pub fn from_parts(
        remote: Arc<dyn RemoteApi>,
        tokens: Arc<dyn TokenProvider>,
        adapter: SuggestionAdapter,
        settings: SettingsStore,
        nav_cooldown: Duration,
    ) -> Self {
        Self {
            login: Arc::new(LoginViewModel::new(AuthRepository::new(remote.clone()))),
            search: Arc::new(SearchViewModel::new(
                SearchRepository::new(remote.clone()),
                SuggestionRepository::new(adapter),
            )),
            watchlist: Arc::new(WatchlistViewModel::new(WatchlistRepository::new(
                remote.clone(),
                tokens.clone(),
            ))),
            saved: Arc::new(SaveForLaterViewModel::new(SaveForLaterRepository::new(
                remote.clone(),
                tokens.clone(),
            ))),
            profile: Arc::new(ProfileViewModel::new(
                UserRepository::new(remote, tokens),
                settings,
            )),
            navigator: Arc::new(Mutex::new(Navigator::new(Route::Search, nav_cooldown))),
            scope: Arc::new(Mutex::new(ScreenScope::new())),
        }
    }

    pub fn current_route(&self) -> Route {
        self.navigator
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .current()
    }

    /// Navigates to `to`. Returns `false` when the move was debounced.
    pub fn navigate(&self, to: Route) -> bool {
        let moved = self
            .navigator
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .navigate(to, Instant::now());
        if moved {
            self.enter(to);
        }
        moved
    }

    pub fn back(&self) -> Option<Route> {
        let route = self.navigator.lock().unwrap_or_else(|e| e.into_inner()).back();
        if let Some(route) = route {
            self.enter(route);
        }
        route
    }

    /// Runs `task` bound to the screen currently showing.
    ///
    /// # Panics
    ///
    /// Panics when no Tokio runtime is available, see [`DealTracker`].
    pub fn spawn_on_screen<F>(&self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.scope
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .spawn(task);
    }

    fn enter(&self, route: Route) {
        info!(?route, "Entering screen");
        let mut scope = self.scope.lock().unwrap_or_else(|e| e.into_inner());
        scope.leave();

        if !scope.has_runtime() {
            warn!(?route, "No Tokio runtime available, skipping screen load");
            return;
        }

        match route {
            Route::Watchlist => {
                let vm = self.watchlist.clone();
                scope.spawn(async move { vm.load().await });
            }
            Route::SaveForLater => {
                let vm = self.saved.clone();
                scope.spawn(async move { vm.load().await });
            }
            Route::Profile => {
                let vm = self.profile.clone();
                scope.spawn(async move {
                    vm.load_theme().await;
                });
            }
            Route::Login | Route::Search => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::error::ApiError;
    use crate::testing::{CountingTokens, FakeRemote, product};
    use crate::ui_state::UiState;

    /// Identity provider that never answers
    struct StalledTokens;

    #[async_trait]
    impl TokenProvider for StalledTokens {
        async fn id_token(&self) -> Result<String, ApiError> {
            std::future::pending().await
        }
    }

    fn tracker_with(
        dir: &tempfile::TempDir,
        tokens: Arc<dyn TokenProvider>,
    ) -> (Arc<FakeRemote>, DealTracker) {
        let remote = Arc::new(FakeRemote::default());
        let tracker = DealTracker::from_parts(
            remote.clone(),
            tokens,
            SuggestionAdapter::disabled(),
            SettingsStore::new(dir.path().join("settings.json")),
            Duration::from_secs(60),
        );
        (remote, tracker)
    }

    fn tracker(dir: &tempfile::TempDir) -> (Arc<FakeRemote>, DealTracker) {
        tracker_with(dir, Arc::new(CountingTokens::default()))
    }

    #[tokio::test]
    async fn entering_watchlist_loads_it() {
        let dir = tempfile::tempdir().unwrap();
        let (remote, tracker) = tracker(&dir);
        remote
            .watchlist
            .lock()
            .unwrap()
            .push(product("Pixel 8", "Amazon", 52999.0, 59999.0));

        let mut items = tracker.watchlist.items();
        assert!(tracker.navigate(Route::Watchlist));
        assert_eq!(tracker.current_route(), Route::Watchlist);

        items
            .wait_for(|state| state.is_terminal())
            .await
            .unwrap();
        assert!(matches!(tracker.watchlist.items_state(), UiState::Success(p) if p.len() == 1));
    }

    #[tokio::test]
    async fn rapid_repeat_navigation_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let (_, tracker) = tracker(&dir);

        assert!(tracker.navigate(Route::Profile));
        assert_eq!(tracker.back(), Some(Route::Search));
        assert!(!tracker.navigate(Route::Profile));
        assert_eq!(tracker.current_route(), Route::Search);
    }

    #[tokio::test]
    async fn leaving_mid_load_returns_screen_to_idle() {
        let dir = tempfile::tempdir().unwrap();
        let (remote, tracker) = tracker_with(&dir, Arc::new(StalledTokens));

        let mut items = tracker.watchlist.items();
        assert!(tracker.navigate(Route::Watchlist));
        items.wait_for(|state| state.is_loading()).await.unwrap();

        assert!(tracker.navigate(Route::Profile));
        tokio::time::timeout(
            Duration::from_secs(5),
            items.wait_for(|state| *state == UiState::Idle),
        )
        .await
        .expect("watchlist left in loading state")
        .unwrap();
        assert!(remote.calls().is_empty());
    }

    #[test]
    fn navigation_outside_runtime_skips_load() {
        let dir = tempfile::tempdir().unwrap();
        let (remote, tracker) = tracker(&dir);

        assert!(tracker.navigate(Route::Watchlist));
        assert_eq!(tracker.current_route(), Route::Watchlist);
        assert_eq!(tracker.watchlist.items_state(), UiState::Idle);
        assert!(remote.calls().is_empty());
    }

    #[test]
    fn navigation_from_plain_thread_uses_captured_runtime() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let (remote, tracker) = {
            let _guard = runtime.enter();
            tracker(&dir)
        };
        remote
            .watchlist
            .lock()
            .unwrap()
            .push(product("Pixel 8", "Amazon", 52999.0, 59999.0));

        let mut items = tracker.watchlist.items();
        assert!(tracker.navigate(Route::Watchlist));
        runtime
            .block_on(items.wait_for(|state| state.is_terminal()))
            .unwrap();
        assert!(matches!(tracker.watchlist.items_state(), UiState::Success(p) if p.len() == 1));
    }
}
