use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{LazyLock, RwLock},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::{ConfigError, Result},
    paths::{expand_home, xdg_config_home},
};

pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/drive/v3";
pub const DEFAULT_FILE_FIELDS: &str = "id, name, mimeType, parents, size, modifiedTime, trashed";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const MAX_PAGE_SIZE: u32 = 1000;
pub const DEFAULT_USER_AGENT: &str = "drivekit";

/// Environment variables checked, in order, for an access token.
pub const TOKEN_ENV: [&str; 2] = ["DRIVEKIT_TOKEN", "GOOGLE_DRIVE_TOKEN"];

/// Application's configuration
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Base URL of the Drive REST API.
    /// Default: https://www.googleapis.com/drive/v3
    pub api_url: Option<String>,

    /// OAuth access token sent as a bearer token.
    /// Default: $DRIVEKIT_TOKEN, then $GOOGLE_DRIVE_TOKEN
    pub access_token: Option<String>,

    /// Number of files requested per page when listing.
    /// `0` leaves the page size to the service.
    /// Default: 100
    pub page_size: Option<u32>,

    /// File fields requested for listed and fetched files.
    /// Default: "id, name, mimeType, parents, size, modifiedTime, trashed"
    pub file_fields: Option<String>,

    /// User agent sent with every request.
    /// Default: drivekit
    pub user_agent: Option<String>,

    /// Proxy URL for all requests.
    pub proxy: Option<String>,

    /// Global request timeout in seconds.
    pub timeout: Option<u64>,

    /// Directory downloads are written to when no output is given.
    /// Default: current directory
    pub download_dir: Option<String>,
}

pub static CONFIG: LazyLock<RwLock<Option<Config>>> = LazyLock::new(|| RwLock::new(None));

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match env::var("DRIVEKIT_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("drivekit").join("config.toml"),
    })
});

/// Loads the configuration from [`CONFIG_PATH`] into the process-wide [`CONFIG`].
pub fn init() -> Result<()> {
    let config = Config::new()?;
    let mut global_config = CONFIG.write().unwrap();
    *global_config = Some(config);
    Ok(())
}

/// Overrides the path [`init`] reads from.
pub fn set_config_path(path: impl Into<PathBuf>) {
    let mut config_path = CONFIG_PATH.write().unwrap();
    *config_path = path.into();
}

/// Returns the process-wide configuration, or defaults if [`init`] was never called.
pub fn get_config() -> Config {
    CONFIG.read().unwrap().clone().unwrap_or_default()
}

impl Config {
    /// A config with every defaulted setting written out, used as a starting template.
    pub fn default_config() -> Self {
        Self {
            api_url: Some(DEFAULT_API_URL.to_string()),
            page_size: Some(DEFAULT_PAGE_SIZE),
            file_fields: Some(DEFAULT_FILE_FIELDS.to_string()),
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
            ..Default::default()
        }
    }

    /// Loads the configuration file at [`CONFIG_PATH`].
    pub fn new() -> Result<Self> {
        let path = CONFIG_PATH.read().unwrap().clone();
        Self::load(&path)
    }

    /// Loads a configuration file, returning defaults if it does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            debug!(
                "Config file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.api_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::InvalidValue {
                    field: "api_url",
                    reason: format!("`{url}` is not an http(s) URL"),
                });
            }
        }

        if let Some(page_size) = self.page_size {
            if page_size > MAX_PAGE_SIZE {
                return Err(ConfigError::InvalidValue {
                    field: "page_size",
                    reason: format!("must be at most {MAX_PAGE_SIZE}, got {page_size}"),
                });
            }
        }

        if self.timeout == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "timeout",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.access_token.as_deref().is_some_and(|t| t.trim().is_empty()) {
            warn!("access_token is set but empty; falling back to environment");
        }

        Ok(())
    }

    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
    }

    /// The access token from the config file, else the first non-empty [`TOKEN_ENV`] variable.
    pub fn access_token(&self) -> Option<String> {
        self.access_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                TOKEN_ENV
                    .iter()
                    .filter_map(|key| env::var(key).ok())
                    .find(|t| !t.trim().is_empty())
            })
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn file_fields(&self) -> &str {
        self.file_fields.as_deref().unwrap_or(DEFAULT_FILE_FIELDS)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use tempfile::TempDir;

    use super::*;
    use crate::test_utils::{with_env, without_env};

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url(), DEFAULT_API_URL);
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(config.file_fields(), DEFAULT_FILE_FIELDS);
        assert_eq!(config.user_agent(), "drivekit");
        assert!(config.timeout().is_none());
        assert_eq!(config.download_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_default_config_template() {
        let template = Config::default_config();
        let content = template.to_toml().unwrap();
        assert!(content.contains("page_size = 100"));
        assert!(!content.contains("access_token"));
        assert_eq!(Config::from_toml(&content).unwrap(), template);
    }

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml(
            r#"
            api_url = "http://localhost:8080/drive/v3/"
            page_size = 50
            file_fields = "id, name"
            timeout = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.api_url(), "http://localhost:8080/drive/v3");
        assert_eq!(config.page_size(), 50);
        assert_eq!(config.file_fields(), "id, name");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_rejects_unknown_scheme() {
        let err = Config::from_toml(r#"api_url = "ftp://example.com""#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "api_url",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_large_page_size() {
        let err = Config::from_toml("page_size = 5000").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "page_size",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert!(Config::from_toml("timeout = 0").is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("page_size = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlDeError(_)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_and_roundtrip_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config {
            page_size: Some(10),
            proxy: Some("http://proxy:3128".to_string()),
            ..Default::default()
        };
        fs::write(&path, config.to_toml().unwrap()).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    #[serial]
    fn test_access_token_prefers_config() {
        with_env(vec![("DRIVEKIT_TOKEN", "from-env")], || {
            let config = Config {
                access_token: Some("from-file".to_string()),
                ..Default::default()
            };
            assert_eq!(config.access_token().as_deref(), Some("from-file"));
        });
    }

    #[test]
    #[serial]
    fn test_access_token_env_fallback_order() {
        without_env(&TOKEN_ENV, || {
            with_env(vec![("GOOGLE_DRIVE_TOKEN", "google")], || {
                let config = Config {
                    access_token: Some("  ".to_string()),
                    ..Default::default()
                };
                assert_eq!(config.access_token().as_deref(), Some("google"));

                with_env(vec![("DRIVEKIT_TOKEN", "drivekit")], || {
                    assert_eq!(config.access_token().as_deref(), Some("drivekit"));
                });
            });
        });
    }

    #[test]
    #[serial]
    fn test_access_token_missing() {
        without_env(&TOKEN_ENV, || {
            assert!(Config::default().access_token().is_none());
        });
    }

    #[test]
    #[serial]
    fn test_init_reads_config_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "page_size = 7\n").unwrap();

        set_config_path(&path);
        init().unwrap();
        assert_eq!(get_config().page_size(), 7);

        set_config_path(dir.path().join("absent.toml"));
        init().unwrap();
        assert_eq!(get_config(), Config::default());
    }
}
