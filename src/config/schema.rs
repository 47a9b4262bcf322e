//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::signing::account::{DEFAULT_DERIVATION_PATH, PRIVATE_KEY_ENV_VAR};

/// Root configuration for the client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Network endpoints and request limits.
    pub api: ApiConfig,

    /// Account source and channel.
    pub account: AccountConfig,

    /// Confirmation polling budget.
    pub confirmation: ConfirmationConfig,

    /// Paginated search settings.
    pub search: SearchConfig,

    /// File storage settings.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Network endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the message API.
    pub api_url: String,

    /// Base URL of the scheduler API.
    pub scheduler_url: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api3.aleph.im".to_string(),
            scheduler_url: "https://scheduler.api.aleph.sh".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Account configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Channel messages are published to and searched in.
    pub channel: String,

    /// Environment variable holding the private key.
    pub private_key_env: String,

    /// Derivation path used with a mnemonic.
    pub derivation_path: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            channel: "TEST".to_string(),
            private_key_env: PRIVATE_KEY_ENV_VAR.to_string(),
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
        }
    }
}

/// Confirmation polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Maximum time to wait for confirmation in seconds.
    pub timeout_secs: u64,

    /// Delay between polls in seconds.
    pub interval_secs: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            interval_secs: 5,
        }
    }
}

/// Paginated search configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Messages requested per page.
    pub page_size: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { page_size: 50 }
    }
}

/// File storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Delay between an upload and the lookup of its STORE message, in seconds.
    pub settle_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { settle_secs: 5 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.account.channel, "TEST");
        assert_eq!(config.confirmation.interval_secs, 5);
        assert_eq!(config.search.page_size, 50);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [api]
            api_url = "http://127.0.0.1:4024"

            [confirmation]
            timeout_secs = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.api.api_url, "http://127.0.0.1:4024");
        assert_eq!(config.api.scheduler_url, "https://scheduler.api.aleph.sh");
        assert_eq!(config.confirmation.timeout_secs, 10);
        assert_eq!(config.confirmation.interval_secs, 5);
        assert_eq!(config.observability.log_level, "info");
    }
}
