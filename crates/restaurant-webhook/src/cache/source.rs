//! List/watch sources for the topping catalog

use crate::error::SourceError;
use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};
use restaurant_types::{Status, Topping, ToppingList};
use serde::Deserialize;

/// Stream of incremental catalog changes
pub type WatchStream = BoxStream<'static, Result<WatchEvent, SourceError>>;

/// One change notification, as sent by a Kubernetes-style watch
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "object", rename_all = "UPPERCASE")]
pub enum WatchEvent {
    Added(Topping),
    Modified(Topping),
    Deleted(Topping),
    /// Progress marker carrying only a resource version
    Bookmark(Topping),
    Error(Status),
}

/// Where the topping catalog comes from
#[async_trait]
pub trait ToppingSource: Send + Sync {
    /// Full listing of the catalog
    async fn list(&self) -> Result<ToppingList, SourceError>;

    /// Changes after `resource_version`. The stream ending means the watch
    /// expired and the caller should list again.
    async fn watch(&self, resource_version: &str) -> Result<WatchStream, SourceError>;
}

/// A fixed catalog, used for local runs and tests
#[derive(Debug, Clone, Default)]
pub struct StaticToppingSource {
    toppings: Vec<Topping>,
}

impl StaticToppingSource {
    pub fn new(toppings: Vec<Topping>) -> Self {
        Self { toppings }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(Topping::new).collect())
    }
}

#[async_trait]
impl ToppingSource for StaticToppingSource {
    async fn list(&self) -> Result<ToppingList, SourceError> {
        Ok(ToppingList::new(self.toppings.clone(), "1"))
    }

    async fn watch(&self, _resource_version: &str) -> Result<WatchStream, SourceError> {
        Ok(stream::pending().boxed())
    }
}
