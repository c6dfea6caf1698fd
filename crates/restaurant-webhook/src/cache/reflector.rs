//! Background list/watch loop keeping the topping cache current

use super::source::{ToppingSource, WatchEvent};
use super::store::ToppingCache;
use crate::error::SourceError;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{sleep, Duration};

/// Feeds a [`ToppingCache`] from a [`ToppingSource`]
pub struct Reflector {
    source: Arc<dyn ToppingSource>,
    cache: Arc<ToppingCache>,
    relist_backoff: Duration,
}

impl Reflector {
    pub fn new(
        source: Arc<dyn ToppingSource>,
        cache: Arc<ToppingCache>,
        relist_backoff: Duration,
    ) -> Self {
        Self {
            source,
            cache,
            relist_backoff,
        }
    }

    /// List, watch and relist until `shutdown` flips to true or its sender is dropped
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!("Topping reflector started");

        while !*shutdown.borrow() {
            tokio::select! {
                result = self.list_and_watch() => match result {
                    Ok(()) => tracing::debug!("Topping watch closed, relisting"),
                    Err(e) => tracing::warn!(error = %e, "Topping list/watch failed"),
                },
                _ = shutdown.changed() => break,
            }

            tokio::select! {
                _ = sleep(self.relist_backoff) => {}
                _ = shutdown.changed() => break,
            }
        }

        tracing::info!("Topping reflector stopped");
    }

    /// One full list followed by a watch from the listed resource version
    async fn list_and_watch(&self) -> Result<(), SourceError> {
        let list = self.source.list().await?;
        let resource_version = list.resource_version().to_string();
        let count = list.items.len();
        self.cache.replace(list.items);
        tracing::info!(count, resource_version = %resource_version, "Topping cache synced");

        let mut events = self.source.watch(&resource_version).await?;
        while let Some(event) = events.next().await {
            match event? {
                WatchEvent::Added(topping) | WatchEvent::Modified(topping) => {
                    tracing::debug!(topping = %topping.name(), "Topping updated");
                    self.cache.upsert(topping);
                }
                WatchEvent::Deleted(topping) => {
                    tracing::debug!(topping = %topping.name(), "Topping deleted");
                    self.cache.delete(topping.name());
                }
                WatchEvent::Bookmark(_) => {}
                WatchEvent::Error(status) => return Err(SourceError::Watch(status.message)),
            }
        }

        Ok(())
    }
}
