//! Credential providers and bearer-token formatting

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::traits::TokenProvider;

/// `Authorization` header value for an identity-provider id token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(id_token: &str) -> Self {
        Self(format!("Bearer {id_token}"))
    }

    /// Requests a fresh id token from `provider` and wraps it.
    pub async fn fetch(provider: &dyn TokenProvider) -> Result<Self, ApiError> {
        let token = provider.id_token().await?;
        if token.trim().is_empty() {
            return Err(ApiError::Auth("identity provider returned an empty token".to_string()));
        }
        Ok(Self::new(&token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider backed by a token supplied through configuration
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn id_token(&self) -> Result<String, ApiError> {
        self.token
            .clone()
            .ok_or_else(|| ApiError::Auth("no signed-in user".to_string()))
    }
}

/// Wraps a provider with a bounded refresh policy.
///
/// Only [`ApiError::NoInternet`] is retried; the delay doubles after each failed
/// attempt, starting at `initial_backoff`.
pub struct RetryingTokenProvider<P> {
    inner: P,
    max_attempts: u32,
    initial_backoff: Duration,
}

impl<P: TokenProvider> RetryingTokenProvider<P> {
    pub fn new(inner: P, max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            initial_backoff,
        }
    }
}

#[async_trait]
impl<P: TokenProvider> TokenProvider for RetryingTokenProvider<P> {
    async fn id_token(&self) -> Result<String, ApiError> {
        let mut backoff = self.initial_backoff;
        let mut attempt = 1;

        loop {
            match self.inner.id_token().await {
                Ok(token) => {
                    debug!(attempt, "Token refreshed");
                    return Ok(token);
                }
                Err(ApiError::NoInternet(reason)) if attempt < self.max_attempts => {
                    warn!(attempt, %reason, "Token refresh failed, retrying");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Flaky {
        failures_left: Mutex<u32>,
        error: ApiError,
        calls: Mutex<u32>,
    }

    impl Flaky {
        fn new(failures: u32, error: ApiError) -> Self {
            Self {
                failures_left: Mutex::new(failures),
                error,
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl TokenProvider for Flaky {
        async fn id_token(&self) -> Result<String, ApiError> {
            *self.calls.lock().unwrap() += 1;
            let mut left = self.failures_left.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                return Err(self.error.clone());
            }
            Ok("id-token".to_string())
        }
    }

    #[test]
    fn bearer_format() {
        assert_eq!(BearerToken::new("abc").as_str(), "Bearer abc");
        assert_eq!(BearerToken::new("abc").to_string(), "Bearer abc");
    }

    #[tokio::test]
    async fn static_provider_without_token_is_auth_error() {
        let provider = StaticTokenProvider::new(None);
        let err = BearerToken::fetch(&provider).await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));
    }

    #[tokio::test]
    async fn empty_token_is_rejected() {
        let provider = StaticTokenProvider::new(Some("  ".to_string()));
        assert!(matches!(
            BearerToken::fetch(&provider).await,
            Err(ApiError::Auth(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_network_failures_until_success() {
        let provider = RetryingTokenProvider::new(
            Flaky::new(2, ApiError::NoInternet("dns".to_string())),
            3,
            Duration::from_millis(100),
        );
        let started = tokio::time::Instant::now();
        assert_eq!(provider.id_token().await.unwrap(), "id-token");
        assert_eq!(provider.inner.calls(), 3);
        // 100 ms, then doubled to 200 ms
        assert_eq!(started.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let provider = RetryingTokenProvider::new(
            Flaky::new(5, ApiError::NoInternet("dns".to_string())),
            2,
            Duration::from_millis(100),
        );
        let started = tokio::time::Instant::now();
        assert!(matches!(
            provider.id_token().await,
            Err(ApiError::NoInternet(_))
        ));
        assert_eq!(provider.inner.calls(), 2);
        assert_eq!(started.elapsed(), Duration::from_millis(100));
    }

    #[tokio::test]
    async fn other_failures_are_not_retried() {
        let provider = RetryingTokenProvider::new(
            Flaky::new(1, ApiError::Auth("revoked".to_string())),
            5,
            Duration::from_millis(100),
        );
        assert!(provider.id_token().await.is_err());
        assert_eq!(provider.inner.calls(), 1);
    }
}
