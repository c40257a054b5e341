//! Configuration for spacetrack.
//!
//! Config file resolution order:
//! 1. Explicit path passed to Config::load()
//! 2. SPACETRACK_CONFIG environment variable
//! 3. Default: <config dir>/spacetrack/config.toml

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::client::SessionCookie;
use crate::persist::PersistMode;
use crate::query::Format;
use crate::{Error, Result};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "SPACETRACK_CONFIG";

const CONFIG_FILE_NAME: &str = "config.toml";

/// spacetrack configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// File this config was loaded from and is saved to.
    #[serde(skip)]
    pub path: PathBuf,

    /// Directory where fetched records are persisted.
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// File holding the base64 passphrase used to seal credentials.
    #[serde(default)]
    pub secret_file: Option<PathBuf>,

    /// One file per fetch, or one file per record.
    #[serde(default)]
    pub persist_mode: PersistMode,

    /// Format used for persisted files when none is given on the command line.
    #[serde(default)]
    pub format: Format,

    /// Log level: error, warn, info, debug, trace.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Append log lines to this file instead of stderr.
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    #[serde(default)]
    pub auth: AuthConfig,
}

/// Account credentials and the last session cookie.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub identity: String,

    #[serde(default)]
    pub password: String,

    /// Identity and password are sealed with the secret file passphrase.
    #[serde(default)]
    pub sealed: bool,

    #[serde(default)]
    pub session: Option<SessionCookie>,
}

impl AuthConfig {
    pub fn has_credentials(&self) -> bool {
        !self.identity.is_empty() && !self.password.is_empty()
    }
}

fn default_work_dir() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.data_dir().join("records"),
        None => PathBuf::from("spacetrack"),
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "space-track", "spacetrack")
}

impl Config {
    /// Create a default config bound to the given file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            work_dir: default_work_dir(),
            secret_file: None,
            persist_mode: PersistMode::default(),
            format: Format::default(),
            log_level: default_log_level(),
            log_file: None,
            auth: AuthConfig::default(),
        }
    }

    /// Load config using the standard resolution order, or defaults if the file is missing.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = resolve_config_path(explicit)?;
        Self::load_from(&path)
    }

    /// Load config from a specific file, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
            config.path = path.to_path_buf();
            Ok(config)
        } else {
            Ok(Self::with_path(path))
        }
    }

    /// Save config to its file, creating the parent directory.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

/// Resolve the config file path using the standard resolution order.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    if let Some(dirs) = project_dirs() {
        return Ok(dirs.config_dir().join(CONFIG_FILE_NAME));
    }

    let home = std::env::var("HOME")
        .map_err(|_| Error::Config("Could not determine home directory".to_string()))?;
    Ok(PathBuf::from(home).join(".config/spacetrack").join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    #[test]
    fn test_config_with_path() {
        let config = Config::with_path("/tmp/spacetrack/config.toml");
        assert_eq!(config.path, PathBuf::from("/tmp/spacetrack/config.toml"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.persist_mode, PersistMode::Batch);
        assert_eq!(config.format, Format::Json);
        assert!(!config.auth.has_credentials());
    }

    #[test]
    fn test_resolve_explicit_path() {
        let path = resolve_config_path(Some(Path::new("/etc/spacetrack.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("/etc/spacetrack.toml"));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.path, path);
        assert!(config.auth.session.is_none());
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/config.toml");

        let mut config = Config::with_path(&path);
        config.work_dir = tmp.path().join("records");
        config.format = Format::Csv;
        config.persist_mode = PersistMode::PerRow;
        config.auth.identity = "user@example.com".to_string();
        config.auth.password = "hunter22".to_string();
        config.auth.session = Some(SessionCookie {
            value: "abc".to_string(),
            expires_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
        });
        config.save().unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.work_dir, config.work_dir);
        assert_eq!(loaded.format, Format::Csv);
        assert_eq!(loaded.persist_mode, PersistMode::PerRow);
        assert_eq!(loaded.auth.identity, "user@example.com");
        assert!(loaded.auth.has_credentials());
        assert_eq!(loaded.auth.session, config.auth.session);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "log_level = \"debug\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.format, Format::Json);
        assert!(config.auth.identity.is_empty());
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "format = \"yaml\"\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }
}
