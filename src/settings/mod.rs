//! Persisted user preferences (currently only the theme)

use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Key under which the theme name is stored
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub fn name(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parses a stored theme name; unknown names fall back to the default.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Self::System),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(anyhow::anyhow!("unknown theme: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    pub theme: Theme,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<String>,
}

/// JSON file holding the settings
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the settings. A missing or unreadable file yields defaults.
    pub async fn load(&self) -> Settings {
        match self.read().await {
            Ok(Some(stored)) => Settings {
                theme: stored.theme.as_deref().map(Theme::from_name).unwrap_or_default(),
            },
            Ok(None) => Settings::default(),
            Err(e) => {
                warn!("Ignoring unreadable settings file {}: {:#}", self.path.display(), e);
                Settings::default()
            }
        }
    }

    /// `None` when the file does not exist yet.
    async fn read(&self) -> Result<Option<StoredSettings>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub async fn save_theme(&self, theme: Theme) -> Result<()> {
        let mut stored = self.read().await.ok().flatten().unwrap_or_default();
        stored.theme = Some(theme.name().to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&stored)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;

        info!("Theme set to {}", theme.name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_names_parse_case_insensitively() {
        assert_eq!(Theme::from_name("DARK"), Theme::Dark);
        assert_eq!(Theme::from_name(" light "), Theme::Light);
        assert_eq!(Theme::from_name("solarized"), Theme::System);
        assert!("solarized".parse::<Theme>().is_err());
    }

    #[tokio::test]
    async fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("absent.json"));
        assert!(store.read().await.unwrap().is_none());
        assert_eq!(store.load().await, Settings::default());
    }

    #[tokio::test]
    async fn unreadable_path_is_an_error_not_absence() {
        let dir = tempfile::tempdir().unwrap();
        // A directory exists at the path but cannot be read as a file
        let store = SettingsStore::new(dir.path());
        assert!(store.read().await.is_err());
        assert_eq!(store.load().await, Settings::default());
    }

    #[tokio::test]
    async fn unknown_stored_theme_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, r#"{"theme":"neon"}"#).await.unwrap();
        assert_eq!(SettingsStore::new(path).load().await.theme, Theme::System);
    }

    #[tokio::test]
    async fn corrupt_file_gives_defaults_and_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let store = SettingsStore::new(&path);

        store.save_theme(Theme::Light).await.unwrap();
        tokio::fs::write(&path, "{not json").await.unwrap();
        assert_eq!(store.load().await.theme, Theme::System);

        store.save_theme(Theme::Dark).await.unwrap();
        assert_eq!(store.load().await.theme, Theme::Dark);
        assert!(tokio::fs::read_to_string(&path).await.unwrap().contains(THEME_KEY));
    }
}
