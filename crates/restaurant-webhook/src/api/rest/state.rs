//! Application state for API handlers

use crate::cache::ToppingLister;
use crate::codec::Codecs;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Type scheme and serializers
    pub codecs: Arc<Codecs>,

    /// Read side of the topping cache
    pub toppings: Arc<dyn ToppingLister>,

    /// Webhook version
    pub version: String,

    /// Webhook start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(codecs: Arc<Codecs>, toppings: Arc<dyn ToppingLister>) -> Self {
        Self {
            codecs,
            toppings,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Get uptime as a human-readable string
    pub fn uptime(&self) -> String {
        let secs = (chrono::Utc::now() - self.started_at).num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else if secs < 86400 {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        } else {
            format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
        }
    }
}
