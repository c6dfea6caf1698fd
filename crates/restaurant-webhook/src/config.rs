//! Configuration for restaurant-webhook

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main webhook configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Where the topping catalog is read from
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Reflector configuration
    #[serde(default)]
    pub informer: InformerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            request_timeout_secs: default_request_timeout(),
            max_body_size: default_max_body_size(),
        }
    }
}

/// Topping catalog source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogConfig {
    /// Fixed list of topping names (development/testing)
    Static {
        #[serde(default)]
        toppings: Vec<String>,
    },

    /// List and watch toppings on an API server
    Kubernetes(KubernetesCatalogConfig),
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig::Static {
            toppings: Vec::new(),
        }
    }
}

/// API server connection for the topping catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KubernetesCatalogConfig {
    /// Base URL of the API server
    pub api_server: String,

    /// File holding a bearer token
    #[serde(default)]
    pub token_file: Option<String>,

    /// Server-side watch timeout in seconds
    #[serde(default = "default_watch_timeout")]
    pub watch_timeout_secs: u64,
}

/// Reflector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InformerConfig {
    /// Pause between a failed or expired watch and the next list
    #[serde(default = "default_relist_backoff")]
    pub relist_backoff_secs: u64,
}

impl Default for InformerConfig {
    fn default() -> Self {
        Self {
            relist_backoff_secs: default_relist_backoff(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8443))
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_body_size() -> usize {
    3 * 1024 * 1024
}

fn default_watch_timeout() -> u64 {
    300
}

fn default_relist_backoff() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl WebhookConfig {
    /// Load configuration: defaults, then an optional file, then `RESTAURANT__*`
    /// environment variables (`__` separates nested keys)
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&WebhookConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("RESTAURANT")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
