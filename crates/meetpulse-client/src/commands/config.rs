//! Configuration commands.

use std::path::Path;

use tracing::info;

use crate::config::{ClientConfig, Overrides};
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig, path: &Path) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {e}")))?;
    println!("# config.toml ({})", path.display());
    println!("{toml_str}");
    Ok(())
}

/// Validate the configuration, including command-line overrides.
pub fn validate(config: &ClientConfig, overrides: &Overrides) -> ClientResult<()> {
    let resolved = config.resolve(overrides)?;
    println!("backend:  {}", resolved.api.base_url);
    println!("client:   {}", resolved.google_client_id);
    println!("session:  {}", resolved.session_path.display());
    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> ClientResult<()> {
    println!("config: {}", path.display());
    Ok(())
}

/// Writes the given settings into the config file at `path`.
pub fn init(
    path: &Path,
    backend_url: Option<&str>,
    google_client_id: Option<&str>,
) -> ClientResult<()> {
    if backend_url.is_none() && google_client_id.is_none() {
        return Err(ClientError::Config(
            "nothing to write, pass --set-backend-url and/or --set-google-client-id".to_string(),
        ));
    }

    write_settings(path, backend_url, google_client_id)?;
    info!(path = %path.display(), "updated config");
    println!("Settings saved to {}", path.display());
    Ok(())
}

/// Sets top-level keys in `path`, preserving the rest of the document.
fn write_settings(
    path: &Path,
    backend_url: Option<&str>,
    google_client_id: Option<&str>,
) -> ClientResult<()> {
    let content = if path.exists() {
        std::fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut doc = content.parse::<toml_edit::DocumentMut>().map_err(|e| {
        ClientError::Config(format!("could not parse {} for writing: {e}", path.display()))
    })?;

    if let Some(url) = backend_url {
        meetpulse_api::ApiConfig::new(url).map_err(|e| ClientError::Config(e.message().to_string()))?;
        doc["backend_url"] = toml_edit::value(url);
    }
    if let Some(client_id) = google_client_id {
        doc["google_client_id"] = toml_edit::value(client_id);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, doc.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_settings_preserves_existing_content() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(
            &config_path,
            "# my settings\ntimeout_secs = 10\nbackend_url = \"http://old\"\n",
        )
        .unwrap();

        write_settings(
            &config_path,
            Some("https://api.example.com"),
            Some("id.apps.googleusercontent.com"),
        )
        .unwrap();

        let written = std::fs::read_to_string(&config_path).unwrap();
        assert!(written.contains("# my settings"));

        let reloaded = ClientConfig::load_from(&config_path).unwrap();
        assert_eq!(reloaded.backend_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(
            reloaded.google_client_id.as_deref(),
            Some("id.apps.googleusercontent.com")
        );
        assert_eq!(reloaded.timeout_secs, Some(10));
    }

    #[test]
    fn write_settings_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("meetpulse").join("config.toml");

        write_settings(&config_path, None, Some("id")).unwrap();

        let reloaded = ClientConfig::load_from(&config_path).unwrap();
        assert_eq!(reloaded.google_client_id.as_deref(), Some("id"));
        assert!(reloaded.backend_url.is_none());
    }

    #[test]
    fn write_settings_rejects_bad_url() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("config.toml");

        assert!(write_settings(&config_path, Some("not a url"), None).is_err());
        assert!(!config_path.exists());
    }

    #[test]
    fn init_requires_a_value() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(init(&tmp.path().join("config.toml"), None, None).is_err());
    }
}
