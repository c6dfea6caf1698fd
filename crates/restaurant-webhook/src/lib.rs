//! Restaurant webhook library
//!
//! Conversion, defaulting and validation webhooks for the
//! `restaurant.programming-kubernetes.info` API group:
//! - Multi-version envelope decoding with content negotiation
//! - v1alpha1 <-> v1beta1 pizza conversion
//! - Topping defaulting answered with a JSON Patch
//! - Topping validation against a list/watch read cache

pub mod api;
pub mod cache;
pub mod codec;
pub mod config;
pub mod conversion;
pub mod error;
pub mod mutation;
pub mod scheme;
pub mod server;
pub mod validation;

pub use cache::{ToppingCache, ToppingLister};
pub use codec::Codecs;
pub use config::WebhookConfig;
pub use error::{ApiError, WebhookError};
pub use server::Server;
