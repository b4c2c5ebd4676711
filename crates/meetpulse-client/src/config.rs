//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/meetpulse/config.toml` by default:
//!
//! ```toml
//! backend_url = "https://meetpulse.example.com"
//! google_client_id = "1234.apps.googleusercontent.com"
//! # session_path = "/home/me/.local/share/meetpulse/session.json"
//! # timeout_secs = 30
//! ```
//!
//! Command-line flags and `MEETPULSE_*` environment variables override the
//! file. There are no built-in defaults for the backend URL or client id.

use std::path::{Path, PathBuf};
use std::time::Duration;

use meetpulse_api::ApiConfig;
use meetpulse_session::IdentityStorage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

const USER_AGENT: &str = concat!("meetpulse-cli/", env!("CARGO_PKG_VERSION"));

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the meetings backend.
    pub backend_url: Option<String>,

    /// OAuth client id credentials are issued for.
    pub google_client_id: Option<String>,

    /// Where the signed-in identity is stored.
    pub session_path: Option<PathBuf>,

    /// Per-request timeout. Requests wait indefinitely when unset.
    pub timeout_secs: Option<u64>,
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend_url: Option<String>,
    pub google_client_id: Option<String>,
    pub session_path: Option<PathBuf>,
}

/// Configuration with every required value present and validated.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api: ApiConfig,
    pub google_client_id: String,
    pub session_path: PathBuf,
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if it does
    /// not exist.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            ClientError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meetpulse")
            .join("config.toml")
    }

    /// Applies `overrides` and checks that everything required is set.
    pub fn resolve(&self, overrides: &Overrides) -> ClientResult<ResolvedConfig> {
        let backend_url = overrides
            .backend_url
            .as_deref()
            .or(self.backend_url.as_deref())
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                ClientError::Config(format!(
                    "backend_url is not set. Add it to {} or set MEETPULSE_BACKEND_URL",
                    Self::default_path().display()
                ))
            })?;

        let google_client_id = overrides
            .google_client_id
            .as_deref()
            .or(self.google_client_id.as_deref())
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                ClientError::Config(format!(
                    "google_client_id is not set. Add it to {} or set MEETPULSE_GOOGLE_CLIENT_ID",
                    Self::default_path().display()
                ))
            })?;

        let mut api = ApiConfig::new(backend_url)
            .map_err(|e| ClientError::Config(e.message().to_string()))?
            .with_user_agent(USER_AGENT);
        if let Some(secs) = self.timeout_secs {
            if secs == 0 {
                return Err(ClientError::Config(
                    "timeout_secs must be greater than zero".to_string(),
                ));
            }
            api = api.with_timeout(Duration::from_secs(secs));
        }

        let session_path = match overrides.session_path.clone().or_else(|| self.session_path.clone()) {
            Some(path) => path,
            None => IdentityStorage::default_path()?,
        };

        Ok(ResolvedConfig {
            api,
            google_client_id: google_client_id.to_string(),
            session_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ClientConfig {
        toml::from_str(
            r#"
backend_url = "https://api.example.com/"
google_client_id = "id.apps.googleusercontent.com"
session_path = "/tmp/meetpulse-session.json"
"#,
        )
        .unwrap()
    }

    #[test]
    fn parses_full_file() {
        let config: ClientConfig = toml::from_str(
            r#"
backend_url = "https://api.example.com"
google_client_id = "id.apps.googleusercontent.com"
session_path = "/var/lib/meetpulse/session.json"
timeout_secs = 15
"#,
        )
        .unwrap();

        assert_eq!(config.timeout_secs, Some(15));
        let resolved = config.resolve(&Overrides::default()).unwrap();
        assert_eq!(resolved.api.timeout, Some(Duration::from_secs(15)));
        assert_eq!(
            resolved.session_path,
            PathBuf::from("/var/lib/meetpulse/session.json")
        );
    }

    #[test]
    fn empty_file_is_default() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn backend_url_is_required() {
        let config = ClientConfig {
            google_client_id: Some("id".to_string()),
            ..ClientConfig::default()
        };
        let err = config.resolve(&Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("backend_url"));
    }

    #[test]
    fn client_id_is_required() {
        let config = ClientConfig {
            backend_url: Some("https://api.example.com".to_string()),
            google_client_id: Some("  ".to_string()),
            ..ClientConfig::default()
        };
        let err = config.resolve(&Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("google_client_id"));
    }

    #[test]
    fn backend_url_must_be_http() {
        let config = ClientConfig {
            backend_url: Some("file:///etc/passwd".to_string()),
            ..complete()
        };
        assert!(matches!(
            config.resolve(&Overrides::default()),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = ClientConfig {
            timeout_secs: Some(0),
            ..complete()
        };
        assert!(config.resolve(&Overrides::default()).is_err());
    }

    #[test]
    fn overrides_win() {
        let overrides = Overrides {
            backend_url: Some("http://localhost:5000".to_string()),
            google_client_id: Some("other-id".to_string()),
            session_path: Some(PathBuf::from("/tmp/other.json")),
        };
        let resolved = complete().resolve(&overrides).unwrap();

        assert_eq!(resolved.api.base_url.as_str(), "http://localhost:5000/");
        assert_eq!(resolved.google_client_id, "other-id");
        assert_eq!(resolved.session_path, PathBuf::from("/tmp/other.json"));
        assert!(resolved.api.timeout.is_none());
        assert!(resolved.api.user_agent.starts_with("meetpulse-cli/"));
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "backend_url = [").unwrap();

        let err = ClientConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }
}
