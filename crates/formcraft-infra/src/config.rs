//! Global configuration loader for Formcraft.
//!
//! Reads `config.toml` from the data directory (`~/.formcraft/` in
//! production) and deserializes it into [`GlobalConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use formcraft_types::config::GlobalConfig;

/// Environment variables checked for the Gemini key, in priority order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["FORMCRAFT_GEMINI_API_KEY", "GEMINI_API_KEY"];

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV_VAR: &str = "FORMCRAFT_DATA_DIR";

const DATA_DIR_NAME: &str = ".formcraft";

/// Resolve the data directory: `$FORMCRAFT_DATA_DIR`, else `~/.formcraft`,
/// else `./.formcraft`.
pub fn resolve_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV_VAR).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME))
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// A missing file yields the defaults; an unreadable or malformed one logs a
/// warning and yields the defaults. The API key from the environment, when
/// set, overrides the file.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let mut config = read_config_file(data_dir).await;
    if let Some(key) = api_key_from_env(|name| std::env::var(name).ok()) {
        config.gemini.api_key = Some(key);
    }
    config
}

async fn read_config_file(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// First non-empty key among [`API_KEY_ENV_VARS`].
fn api_key_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}
