//! Restaurant webhook - admission and conversion for pizzas
//!
//! Serves:
//! - `/convert/v1beta1/pizza` for CRD version conversion
//! - `/admit/v1beta1/pizza` for topping defaulting
//! - `/validate/v1beta1/pizza` for topping validation

use clap::Parser;
use restaurant_webhook::config::{CatalogConfig, KubernetesCatalogConfig};
use restaurant_webhook::error::{WebhookError, WebhookResult};
use restaurant_webhook::{Server, WebhookConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Restaurant webhook CLI
#[derive(Parser)]
#[command(name = "restaurant-webhook")]
#[command(about = "Conversion, defaulting and validation webhook for pizzas", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "RESTAURANT_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(short, long, env = "RESTAURANT_LISTEN_ADDR")]
    listen: Option<String>,

    /// Log level
    #[arg(long, env = "RESTAURANT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "RESTAURANT_LOG_JSON")]
    json: bool,

    /// Watch toppings on this API server instead of the configured catalog
    #[arg(long, env = "RESTAURANT_CATALOG_URL")]
    catalog_url: Option<String>,
}

#[tokio::main]
async fn main() -> WebhookResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = WebhookConfig::load(cli.config.as_deref())
        .map_err(|e| WebhookError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| WebhookError::Config(format!("Invalid listen address: {}", e)))?;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.json {
        config.logging.json = true;
    }
    if let Some(api_server) = cli.catalog_url {
        let (token_file, watch_timeout_secs) = match &config.catalog {
            CatalogConfig::Kubernetes(kube) => (kube.token_file.clone(), kube.watch_timeout_secs),
            CatalogConfig::Static { .. } => (None, 300),
        };
        config.catalog = CatalogConfig::Kubernetes(KubernetesCatalogConfig {
            api_server,
            token_file,
            watch_timeout_secs,
        });
    }

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.server.listen_addr,
        "Starting restaurant webhook"
    );

    // Create and run server
    let server = Server::new(config)?;
    server.run().await
}
