//! Support for configuration options

use std::env;
use std::path::PathBuf;

use url::Url;

use crate::error::StoreError;
use crate::resource::Resource;

/// Base URL of the remote store (e.g. `https://xyz.supabase.co`)
pub const ENV_URL: &str = "TASK_BOARD_URL";
/// API key sent with every request to the remote store
pub const ENV_KEY: &str = "TASK_BOARD_KEY";
/// Name of the collection, if it is not `tasks`
pub const ENV_COLLECTION: &str = "TASK_BOARD_COLLECTION";
/// Backing file of the local store, used when no remote URL is configured
pub const ENV_STORE_FILE: &str = "TASK_BOARD_STORE";

pub const DEFAULT_COLLECTION: &str = "tasks";
pub const DEFAULT_STORE_FILE: &str = "task-board.json";
/// The time of day new tasks get unless the user picks another one
pub const DEFAULT_DRAFT_TIME: &str = "23:59";

/// Where the remote store lives, and how to authenticate to it
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub resource: Resource,
    pub collection: String,
}

impl GatewayConfig {
    pub fn new<S: AsRef<str>, T: ToString>(url: S, api_key: T) -> Result<Self, StoreError> {
        let url = Url::parse(url.as_ref())?;
        Ok(Self {
            resource: Resource::new(url, api_key.to_string()),
            collection: DEFAULT_COLLECTION.to_string(),
        })
    }

    pub fn with_collection<S: Into<String>>(mut self, collection: S) -> Self {
        self.collection = collection.into();
        self
    }

    /// Read the configuration from the environment.
    ///
    /// Returns `Ok(None)` when no remote store URL is set.
    pub fn from_env() -> Result<Option<Self>, StoreError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Option<Self>, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = match lookup(ENV_URL) {
            None => return Ok(None),
            Some(url) if url.trim().is_empty() => return Ok(None),
            Some(url) => url,
        };
        let api_key = match lookup(ENV_KEY) {
            None => {
                log::warn!("{} is set but {} is not. Requests will be sent without a key", ENV_URL, ENV_KEY);
                String::new()
            },
            Some(key) => key,
        };

        let mut config = Self::new(url.trim(), api_key)?;
        if let Some(collection) = lookup(ENV_COLLECTION) {
            config = config.with_collection(collection);
        }
        Ok(Some(config))
    }
}

/// Path of the local store backing file
pub fn local_store_file() -> PathBuf {
    env::var(ENV_STORE_FILE)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_FILE))
}
