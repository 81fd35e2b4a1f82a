use tokio::sync::watch;
use tracing::{info, warn};

use crate::repository::AuthRepository;
use crate::ui_state::{StateHolder, UiState, classify_ack};

/// Sign-in screen: exchanges the identity provider's token with the backend
pub struct LoginViewModel {
    repository: AuthRepository,
    state: StateHolder<()>,
}

impl LoginViewModel {
    pub fn new(repository: AuthRepository) -> Self {
        Self {
            repository,
            state: StateHolder::new(),
        }
    }

    pub fn state(&self) -> watch::Receiver<UiState<()>> {
        self.state.subscribe()
    }

    pub fn current(&self) -> UiState<()> {
        self.state.get()
    }

    pub async fn sign_in(&self, id_token: &str) {
        let ticket = self.state.begin();
        let state = classify_ack(self.repository.verify(id_token).await);
        match &state {
            UiState::Success(()) => info!("Signed in"),
            other => warn!(?other, "Sign-in failed"),
        }
        self.state.finish(ticket, state);
    }

    pub fn sign_out(&self) {
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::testing::FakeRemote;

    fn view_model() -> LoginViewModel {
        LoginViewModel::new(AuthRepository::new(Arc::new(FakeRemote::default())))
    }

    #[tokio::test]
    async fn valid_token_signs_in() {
        let vm = view_model();
        vm.sign_in("valid").await;
        assert_eq!(vm.current(), UiState::Success(()));

        vm.sign_out();
        assert_eq!(vm.current(), UiState::Idle);
    }

    #[tokio::test]
    async fn rejected_token_shows_message() {
        let vm = view_model();
        vm.sign_in("forged").await;
        assert_eq!(vm.current(), UiState::Error("Invalid token".to_string()));
    }
}
