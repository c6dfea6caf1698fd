//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::cache::{KubeToppingSource, Reflector, StaticToppingSource, ToppingCache, ToppingSource};
use crate::codec::Codecs;
use crate::config::{CatalogConfig, WebhookConfig};
use crate::error::{WebhookError, WebhookResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Restaurant admission and conversion webhook server
pub struct Server {
    config: WebhookConfig,
    codecs: Arc<Codecs>,
    cache: Arc<ToppingCache>,
    source: Arc<dyn ToppingSource>,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: WebhookConfig) -> WebhookResult<Self> {
        let source: Arc<dyn ToppingSource> = match &config.catalog {
            CatalogConfig::Static { toppings } => {
                tracing::info!(count = toppings.len(), "Using static topping catalog");
                Arc::new(StaticToppingSource::from_names(toppings.iter().cloned()))
            }
            CatalogConfig::Kubernetes(kube) => {
                let source = KubeToppingSource::from_config(kube)?;
                tracing::info!(url = %source.url(), "Watching toppings on API server");
                Arc::new(source)
            }
        };

        Ok(Self::with_source(config, source))
    }

    /// Create a server reading toppings from an explicit source
    pub fn with_source(config: WebhookConfig, source: Arc<dyn ToppingSource>) -> Self {
        Self {
            config,
            codecs: Arc::new(Codecs::new()),
            cache: Arc::new(ToppingCache::new()),
            source,
        }
    }

    /// State shared by every request handler
    pub fn state(&self) -> AppState {
        AppState::new(self.codecs.clone(), self.cache.clone())
    }

    /// Run the server until a shutdown signal arrives
    pub async fn run(self) -> WebhookResult<()> {
        let addr = self.config.server.listen_addr;

        // Create router
        let app = create_router(self.state(), &self.config.server);

        // Create listener
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Restaurant webhook listening on {}", addr);

        // Start the topping reflector in background
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let reflector = Reflector::new(
            self.source.clone(),
            self.cache.clone(),
            Duration::from_secs(self.config.informer.relist_backoff_secs),
        );
        let reflector_task = tokio::spawn(reflector.run(shutdown_rx));

        // Run server with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| WebhookError::Server(e.to_string()))?;

        tracing::info!("Restaurant webhook shutting down");

        // Stop reflector
        let _ = shutdown_tx.send(true);
        if let Err(e) = reflector_task.await {
            tracing::warn!(error = %e, "Topping reflector task failed");
        }

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
