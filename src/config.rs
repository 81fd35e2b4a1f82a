//! Environment-driven configuration

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_SETTINGS_PATH: &str = "deal-tracker-settings.json";
const DEFAULT_NAV_COOLDOWN_MS: u64 = 500;

/// Runtime configuration loaded from the environment (and `.env` if present).
///
/// ## Environment Variables
///
/// - `DEAL_TRACKER_API_URL`: backend base URL
/// - `DEAL_TRACKER_ID_TOKEN`: identity-provider id token for authenticated calls
/// - `GEMINI_API_KEY` / `GEMINI_MODEL`: generative model used for suggestions
/// - `DEAL_TRACKER_SETTINGS`: path of the JSON settings file
/// - `DEAL_TRACKER_NAV_COOLDOWN_MS`: navigation debounce window
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub id_token: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub settings_path: PathBuf,
    pub nav_cooldown: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            id_token: None,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
            nav_cooldown: Duration::from_millis(DEFAULT_NAV_COOLDOWN_MS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let id_token = get("DEAL_TRACKER_ID_TOKEN");
        if id_token.is_none() {
            warn!("DEAL_TRACKER_ID_TOKEN not set - authenticated endpoints will fail");
        }

        let gemini_api_key = get("GEMINI_API_KEY");
        if gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY not set - product suggestions will be disabled");
        }

        let nav_cooldown = get("DEAL_TRACKER_NAV_COOLDOWN_MS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map_or(defaults.nav_cooldown, Duration::from_millis);

        Self {
            api_url: get("DEAL_TRACKER_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            id_token,
            gemini_api_key,
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            settings_path: get("DEAL_TRACKER_SETTINGS")
                .map_or(defaults.settings_path, PathBuf::from),
            nav_cooldown,
        }
    }
}
