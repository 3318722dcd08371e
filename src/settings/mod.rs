use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

// Setting names, as stored. These match the original deployment's preference
// keys so an existing settings file keeps working.
pub const SETTING_ENABLED: &str = "API_ENABLED";
pub const SETTING_API_KEY: &str = "API_KEY";
pub const SETTING_LOG_REQUESTS: &str = "LOG_REQUESTS";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Persistent key/value settings with get/set semantics.
///
/// The API only reads; writes come from the admin CLI. Implementations own
/// durability. Reads must observe the latest saved value, so callers load
/// settings per request rather than caching them.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, name: &str) -> Result<Option<String>, SettingsError>;
    async fn set(&self, name: &str, value: &str) -> Result<(), SettingsError>;
}

/// Settings store backed by a flat JSON object file.
///
/// Every `get` re-reads the file so a concurrent admin `set` is visible on
/// the next request. A missing file reads as empty and is created on first
/// `set`.
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, SettingsError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    async fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let raw = serde_json::to_string_pretty(values)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn get(&self, name: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.read_all().await?.get(name).cloned())
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), SettingsError> {
        let mut values = self.read_all().await?;
        values.insert(name.to_string(), value.to_string());
        self.write_all(&values).await
    }
}

/// Per-request view of the API settings.
///
/// Loaded fresh at the top of every request so admin changes apply without a
/// restart. An empty `secret_key` means authentication can never succeed.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub enabled: bool,
    pub secret_key: String,
    pub logging_enabled: bool,
}

impl ApiConfig {
    pub async fn load(store: &dyn SettingsStore) -> Result<Self, SettingsError> {
        let enabled = flag(store.get(SETTING_ENABLED).await?);
        let secret_key = store.get(SETTING_API_KEY).await?.unwrap_or_default();
        let logging_enabled = flag(store.get(SETTING_LOG_REQUESTS).await?);

        Ok(Self {
            enabled,
            secret_key,
            logging_enabled,
        })
    }
}

// Flags are stored as "1"/"0"; absent means off.
fn flag(value: Option<String>) -> bool {
    matches!(value.as_deref(), Some("1") | Some("true"))
}
