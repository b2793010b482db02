//! Global configuration types for Formcraft.
//!
//! `GlobalConfig` represents the top-level `config.toml` in the data
//! directory. Every section and field has a default, so an empty file (or no
//! file at all) yields a working configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::llm::DEFAULT_MODEL;

/// Minimum length of an API key considered usable.
pub const MIN_API_KEY_LEN: usize = 20;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub breaker: BreakerConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub designer: DesignerConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Gemini API settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_gemini_base_url(),
        }
    }
}

impl GeminiConfig {
    /// The configured key, if it is long enough to be worth calling with.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| k.len() >= MIN_API_KEY_LEN)
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Circuit breaker thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakerConfig {
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

fn default_failure_threshold() -> u32 {
    3
}

fn default_cooldown_secs() -> u64 {
    60
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

/// Retry/backoff settings for the outbound generative call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,
}

fn default_max_retries() -> u32 {
    2
}

fn default_base_delay_ms() -> u64 {
    1500
}

fn default_multiplier() -> f64 {
    1.5
}

fn default_max_delay_ms() -> u64 {
    5000
}

fn default_max_jitter_ms() -> u64 {
    1000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            multiplier: default_multiplier(),
            max_delay_ms: default_max_delay_ms(),
            max_jitter_ms: default_max_jitter_ms(),
        }
    }
}

/// Form generator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignerConfig {
    /// Outer timeout raced against the whole generation call.
    #[serde(default = "default_designer_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_designer_timeout_secs() -> u64 {
    10
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_designer_timeout_secs(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL used to build blob and embed URLs.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

fn default_public_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            public_url: default_public_url(),
        }
    }
}

impl ServerConfig {
    /// Public URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.public_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.breaker.failure_threshold, 3);
        assert_eq!(config.breaker.cooldown_secs, 60);
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.base_delay_ms, 1500);
        assert_eq!(config.retry.max_delay_ms, 5000);
        assert_eq!(config.designer.timeout_secs, 10);
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert!(config.gemini.api_key.is_none());
    }

    #[test]
    fn test_global_config_deserialize_empty() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.retry.max_jitter_ms, 1000);
        assert!((config.retry.multiplier - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_global_config_deserialize_partial_sections() {
        let toml_str = r#"
[gemini]
api_key = "AIzaSy-0123456789abcdefghij"
model = "gemini-1.5-pro"

[breaker]
failure_threshold = 5

[server]
public_url = "https://forms.example.com/"
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.breaker.failure_threshold, 5);
        assert_eq!(config.breaker.cooldown_secs, 60);
        assert_eq!(config.server.base_url(), "https://forms.example.com");
        assert!(config.gemini.usable_api_key().is_some());
    }

    #[test]
    fn test_short_api_key_is_not_usable() {
        let config = GeminiConfig {
            api_key: Some("short".to_string()),
            ..Default::default()
        };
        assert!(config.usable_api_key().is_none());
    }

    #[test]
    fn test_gemini_debug_redacts_key() {
        let config = GeminiConfig {
            api_key: Some("AIzaSy-super-secret-key-value".to_string()),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
