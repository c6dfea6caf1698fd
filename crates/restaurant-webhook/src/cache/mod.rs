//! Topping read cache
//!
//! An in-memory projection of the topping catalog. A single reflector task
//! lists the catalog, marks the cache synced and then follows a watch; request
//! handlers only ever read.

mod kube;
mod reflector;
mod source;
mod store;

pub use kube::KubeToppingSource;
pub use reflector::Reflector;
pub use source::{StaticToppingSource, ToppingSource, WatchEvent, WatchStream};
pub use store::{ToppingCache, ToppingLister};
