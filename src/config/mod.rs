//! Configuration module for the shipping engine

use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};
use std::path::PathBuf;
use std::time::Duration;

/// Main application settings
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub shipping: ShippingSettings,
    pub carriers: CarriersSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Packing, routing and rate-shopping behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShippingSettings {
    /// Shared deadline for one rate-shopping round
    pub rate_deadline_ms: u64,

    /// Retries per service level for transient carrier failures
    pub max_retries: u32,

    /// First backoff delay, doubled on each retry
    pub initial_backoff_ms: u64,

    pub prefer_tube_for_posters: bool,

    /// JSON box table replacing the built-in catalog
    pub box_catalog_path: Option<PathBuf>,

    /// JSON hub table replacing the built-in hubs
    pub hub_table_path: Option<PathBuf>,
}

impl ShippingSettings {
    pub fn rate_deadline(&self) -> Duration {
        Duration::from_millis(self.rate_deadline_ms)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}

/// Per-carrier configuration. Secrets are read from the environment,
/// never from these files.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CarriersSettings {
    pub fedex: FedexSettings,
    pub sandbox: SandboxSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FedexSettings {
    pub enabled: bool,
    pub base_url: String,
    pub rate_limit_per_minute: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SandboxSettings {
    /// Fake carrier with fixed prices. Development only.
    pub enabled: bool,

    /// Labels kept in memory for tracking
    pub max_labels: usize,
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables (prefixed with SHIP_)
    /// 2. config/local.toml (gitignored)
    /// 3. config/default.toml
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));

        let builder = Config::builder()
            // Start with default configuration
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Add local overrides (gitignored)
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // Add environment variables (SHIP_SHIPPING__RATE_DEADLINE_MS, etc.)
            .add_source(
                Environment::with_prefix("SHIP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            );

        builder.build()?.try_deserialize()
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

impl Default for ShippingSettings {
    fn default() -> Self {
        ShippingSettings {
            rate_deadline_ms: 3000,
            max_retries: 1,
            initial_backoff_ms: 200,
            prefer_tube_for_posters: true,
            box_catalog_path: None,
            hub_table_path: None,
        }
    }
}

impl Default for FedexSettings {
    fn default() -> Self {
        FedexSettings {
            enabled: false,
            base_url: crate::carriers::fedex::DEFAULT_BASE_URL.to_string(),
            rate_limit_per_minute: 120,
            timeout_secs: 10,
        }
    }
}

impl Default for SandboxSettings {
    fn default() -> Self {
        SandboxSettings {
            enabled: false,
            max_labels: crate::carriers::sandbox::DEFAULT_LABEL_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.shipping.rate_deadline(), Duration::from_secs(3));
        assert_eq!(settings.shipping.max_retries, 1);
        assert!(settings.shipping.prefer_tube_for_posters);
        assert!(!settings.carriers.fedex.enabled);
        assert!(!settings.carriers.sandbox.enabled);
        assert_eq!(settings.carriers.sandbox.max_labels, 10_000);
    }

    #[test]
    fn test_sandbox_is_opt_in() {
        let settings: Settings = Config::builder()
            .add_source(File::from(std::path::Path::new(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/config/default.toml"
            ))))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert!(!settings.carriers.sandbox.enabled);

        let settings: Settings = Config::builder()
            .add_source(config::File::from_str(
                "[carriers.sandbox]\nenabled = true\nmax_labels = 50\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert!(settings.carriers.sandbox.enabled);
        assert_eq!(settings.carriers.sandbox.max_labels, 50);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = Config::builder()
            .add_source(config::File::from_str(
                r#"
                [shipping]
                rate_deadline_ms = 1500

                [carriers.fedex]
                enabled = true
                base_url = "https://apis-sandbox.fedex.com"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.shipping.rate_deadline_ms, 1500);
        assert_eq!(settings.shipping.initial_backoff_ms, 200);
        assert!(settings.carriers.fedex.enabled);
        assert_eq!(settings.carriers.fedex.base_url, "https://apis-sandbox.fedex.com");
        assert_eq!(settings.carriers.fedex.rate_limit_per_minute, 120);
        assert_eq!(settings.server.host, "0.0.0.0");
    }
}
