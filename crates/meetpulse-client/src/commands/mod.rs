//! Command implementations.

pub mod config;
pub mod dashboard;
pub mod profile;
pub mod records;
pub mod session;

use std::path::Path;
use std::sync::Arc;

use meetpulse_api::ApiClient;
use meetpulse_core::Identity;
use meetpulse_session::{IdentityStorage, SessionStore};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ResolvedConfig;
use crate::error::{ClientError, ClientResult};

/// Everything a command needs to talk to the backend.
pub struct Context {
    pub config: ResolvedConfig,
    pub client: Arc<ApiClient>,
    pub json: bool,
}

impl Context {
    pub fn new(config: ResolvedConfig, json: bool) -> ClientResult<Self> {
        let client = Arc::new(ApiClient::new(&config.api)?);
        Ok(Self {
            config,
            client,
            json,
        })
    }

    /// Builds a session store over the configured session file.
    pub fn session_store(&self) -> SessionStore {
        let storage = IdentityStorage::new(&self.config.session_path);
        SessionStore::new(self.client.clone(), storage)
            .with_client_id(&self.config.google_client_id)
    }

    /// Returns the stored identity without contacting the backend.
    pub fn stored_identity(&self) -> ClientResult<Identity> {
        IdentityStorage::new(&self.config.session_path)
            .load()?
            .ok_or(ClientError::NotSignedIn)
    }
}

/// Prints `value` as pretty JSON.
pub(crate) fn print_json<T: Serialize>(value: &T) -> ClientResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Reads and parses a JSON input file.
pub(crate) fn read_json_file<T: DeserializeOwned>(path: &Path) -> ClientResult<T> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| ClientError::InvalidInput {
        path: path.to_path_buf(),
        source,
    })
}
