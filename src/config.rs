// Configuration module: an explicit settings struct for one sync run.
// The original deployment keeps a `config.env` file next to the binary;
// `from_env` loads it (when present) and then reads the process
// environment. There is no module-level global: the struct is built once
// in `main` and passed into the orchestrator.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Name of the optional dotenv file loaded by [`SyncConfig::from_env`].
pub const CONFIG_FILE: &str = "config.env";

/// Runtime settings for a sync run. All fields are public so a caller can
/// load the environment defaults and then override individual values.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the labeling server. Default source: `SERVER_IP`.
    pub server_url: String,
    /// URL of the ML backend registered on each project. Default source:
    /// `BACKEND_IP`.
    pub backend_url: String,
    /// API token for the labeling server. Default source: `API_KEY`.
    pub api_key: String,
    /// Path to the labeling UI configuration markup uploaded with each
    /// project. Default source: `UI_CONFIG_PATH`.
    pub label_config_path: PathBuf,
    /// Directory scanned for patient folders; also holds the imported
    /// archive. Default source: `DATA_DIR`.
    pub data_dir: PathBuf,
}

impl SyncConfig {
    /// Load settings from `config.env` (if present) and the process
    /// environment. Every key is required; a missing one is reported by
    /// name so the operator knows what to add.
    pub fn from_env() -> Result<Self> {
        // A missing config.env is fine; the variables may be set in the
        // real environment instead.
        let _ = dotenvy::from_filename(CONFIG_FILE);

        Ok(SyncConfig {
            server_url: require("SERVER_IP")?,
            backend_url: require("BACKEND_IP")?,
            api_key: require("API_KEY")?,
            label_config_path: PathBuf::from(require("UI_CONFIG_PATH")?),
            data_dir: PathBuf::from(require("DATA_DIR")?),
        })
    }
}

fn require(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Missing required setting {}", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test touching the environment so parallel tests don't race
    // on set_var.
    #[test]
    fn from_env_reads_all_keys() {
        std::env::set_var("SERVER_IP", "http://server:8080");
        std::env::set_var("BACKEND_IP", "http://backend:9090");
        std::env::set_var("API_KEY", "secret");
        std::env::set_var("UI_CONFIG_PATH", "/etc/labelsync/ui.xml");
        std::env::set_var("DATA_DIR", "/data");

        let config = SyncConfig::from_env().unwrap();
        assert_eq!(config.server_url, "http://server:8080");
        assert_eq!(config.backend_url, "http://backend:9090");
        assert_eq!(config.api_key, "secret");
        assert_eq!(
            config.label_config_path,
            PathBuf::from("/etc/labelsync/ui.xml")
        );
        assert_eq!(config.data_dir, PathBuf::from("/data"));
    }
}
