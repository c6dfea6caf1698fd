//! Restaurant Types - API types for the restaurant webhook
//!
//! The `restaurant.programming-kubernetes.info` API group serves a single
//! versioned resource, `Pizza`, in two schema versions, plus a cluster-scoped
//! `Topping` catalog that pizzas reference by name.
//!
//! ## Versions
//!
//! - **v1alpha1**: toppings are an ordered list of names, duplicates allowed
//! - **v1beta1**: toppings are `(name, quantity)` pairs with unique names
//!
//! ## Key Concepts
//!
//! - **PizzaObject**: closed union over both schema versions
//! - **Conversion**: aggregation (v1alpha1 -> v1beta1) and expansion
//!   (v1beta1 -> v1alpha1) of toppings
//! - **Defaulting**: fixed default toppings when none are given
//! - **Reviews**: admission and conversion envelopes exchanged with the API server

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod conversion;
pub mod defaults;
pub mod meta;
pub mod pizza;
pub mod review;
pub mod topping;

// Re-export main types
pub use conversion::{aggregate, expand, ConversionError, MAX_EXPANDED_TOPPINGS};
pub use defaults::DEFAULT_TOPPINGS;
pub use meta::{GroupVersionKind, GroupVersionResource, ObjectMeta, Status, StatusPhase};
pub use pizza::{v1alpha1, v1beta1, ObjectError, PizzaObject, PizzaVersion, GROUP};
pub use review::{
    AdmissionRequest, AdmissionResponse, AdmissionReview, ConversionRequest, ConversionResponse,
    ConversionReview, Operation, PatchType, RawExtension,
};
pub use topping::{Topping, ToppingList, ToppingSpec};
