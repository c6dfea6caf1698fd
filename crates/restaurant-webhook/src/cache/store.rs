//! In-memory topping store

use crate::error::CacheError;
use dashmap::DashMap;
use restaurant_types::Topping;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

/// Read access to the topping catalog
pub trait ToppingLister: Send + Sync {
    /// Whether at least one full list has been loaded
    fn has_synced(&self) -> bool;

    /// Look up a topping by name; `Ok(None)` means it does not exist
    fn get(&self, name: &str) -> Result<Option<Topping>, CacheError>;
}

/// Concurrent map of toppings keyed by name.
///
/// The reflector is the only writer. Readers never block each other.
#[derive(Debug, Default)]
pub struct ToppingCache {
    items: DashMap<String, Topping>,
    synced: AtomicBool,
}

impl ToppingCache {
    /// Create an empty, not yet synced cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole contents with a fresh listing and mark the cache synced.
    ///
    /// New entries are written before stale ones are dropped, so a topping
    /// present in both listings never disappears for a concurrent reader.
    pub fn replace(&self, toppings: Vec<Topping>) {
        let mut names = HashSet::with_capacity(toppings.len());
        for topping in toppings {
            names.insert(topping.name().to_string());
            self.items.insert(topping.name().to_string(), topping);
        }
        self.items.retain(|name, _| names.contains(name));
        self.synced.store(true, Ordering::Release);
    }

    /// Insert or update a single topping
    pub fn upsert(&self, topping: Topping) {
        self.items.insert(topping.name().to_string(), topping);
    }

    /// Remove a topping by name
    pub fn delete(&self, name: &str) -> bool {
        self.items.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ToppingLister for ToppingCache {
    fn has_synced(&self) -> bool {
        self.synced.load(Ordering::Acquire)
    }

    fn get(&self, name: &str) -> Result<Option<Topping>, CacheError> {
        if name.is_empty() {
            return Err(CacheError::InvalidKey(name.to_string()));
        }
        Ok(self.items.get(name).map(|entry| entry.value().clone()))
    }
}
