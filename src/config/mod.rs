use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Process-level configuration, loaded once at startup from the environment.
///
/// Per-request API settings (enabled flag, API key, request logging) are NOT
/// held here — they live in the settings store and are re-read on every
/// request so that admin changes take effect without a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// JSON file holding the genealogical trees served by the API.
    pub data_file: PathBuf,
    /// JSON key/value file backing the settings store.
    pub settings_file: PathBuf,
    /// Append-only request log sink.
    pub log_file: PathBuf,
    /// Base used when building canonical record URLs in responses.
    pub public_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("LINEAGE_DATA_FILE") {
            self.data_file = PathBuf::from(v);
        }
        if let Ok(v) = env::var("LINEAGE_SETTINGS_FILE") {
            self.settings_file = PathBuf::from(v);
        }
        if let Ok(v) = env::var("LINEAGE_LOG_FILE") {
            self.log_file = PathBuf::from(v);
        }
        if let Ok(v) = env::var("LINEAGE_BASE_URL") {
            self.public_base_url = v.trim_end_matches('/').to_string();
        }
        self
    }

    fn defaults() -> Self {
        Self {
            data_file: PathBuf::from("data/trees.json"),
            settings_file: PathBuf::from("data/settings.json"),
            log_file: PathBuf::from("data/api-requests.log"),
            public_base_url: "http://localhost:3000".to_string(),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::defaults();
        assert_eq!(config.data_file, PathBuf::from("data/trees.json"));
        assert_eq!(config.public_base_url, "http://localhost:3000");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let mut config = AppConfig::defaults();
        config.public_base_url = "https://trees.example.com/".trim_end_matches('/').to_string();
        assert_eq!(config.public_base_url, "https://trees.example.com");
    }
}
