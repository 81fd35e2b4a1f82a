//! Error types shared by the remote layer, repositories and view-models

use thiserror::Error;

/// Failure of a single backend or model call.
///
/// View-models classify these into UI states: `NoInternet` and `Server` get their
/// own variants, everything else becomes an error message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Host could not be resolved or reached
    #[error("no internet connection: {0}")]
    NoInternet(String),

    /// Server answered with a non-2xx status
    #[error("server returned HTTP {status}")]
    Server { status: u16 },

    /// Response body did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// No credential could be obtained from the identity provider
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for ApiError {
    /// Request URLs can carry credentials in their query, so they never reach the message.
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if let Some(status) = err.status() {
            return Self::Server {
                status: status.as_u16(),
            };
        }
        if err.is_connect() {
            return Self::NoInternet(err.to_string());
        }
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        Self::Other(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Why the generative-suggestion adapter produced no products
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestionError {
    #[error("suggestions are disabled: no model API key configured")]
    Disabled,

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("model response contains no JSON object")]
    NoJsonObject,

    #[error("could not understand model output: {0}")]
    Malformed(String),

    #[error(transparent)]
    Transport(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            ApiError::Server { status: 503 }.to_string(),
            "server returned HTTP 503"
        );
        assert_eq!(ApiError::Other("boom".to_string()).to_string(), "boom");
        assert_eq!(
            SuggestionError::Transport(ApiError::Auth("expired".to_string())).to_string(),
            "authentication failed: expired"
        );
    }

    #[test]
    fn json_errors_are_decode_failures() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(matches!(ApiError::from(err), ApiError::Decode(_)));
    }
}
