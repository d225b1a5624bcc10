use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings file read when `--config` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = "ddlgraph.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Invocation defaults loaded from TOML. Command-line flags take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub run_dir: PathBuf,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub qualify_names: bool,
    pub drop_if_exists: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            run_dir: PathBuf::from("runs"),
            max_connections: 5,
            acquire_timeout_secs: 10,
            qualify_names: false,
            drop_if_exists: true,
        }
    }
}

impl Settings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// Load settings from `explicit`, or from [`DEFAULT_SETTINGS_FILE`] when it
/// exists in the working directory. An explicit path must exist.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, SettingsError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_SETTINGS_FILE);
            if !fallback.exists() {
                return Ok(Settings::default());
            }
            fallback
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| SettingsError::Io {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| SettingsError::Toml { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ddlgraph.toml");
        std::fs::write(&path, "run_dir = \"out/runs\"\nqualify_names = true\n").unwrap();

        let settings = load_settings(Some(&path)).unwrap();

        assert_eq!(settings.run_dir, PathBuf::from("out/runs"));
        assert!(settings.qualify_names);
        assert!(settings.drop_if_exists);
        assert_eq!(settings.max_connections, 5);
        assert_eq!(settings.acquire_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ddlgraph.toml");
        std::fs::write(&path, "max_conections = 3\n").unwrap();

        let err = load_settings(Some(&path)).unwrap_err();
        assert!(matches!(err, SettingsError::Toml { .. }));
    }
}
