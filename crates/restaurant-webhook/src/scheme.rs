//! Multi-version type scheme
//!
//! Maps every registered group/version/kind to the Rust type that decodes it.
//! Decoding reads `apiVersion` and `kind` from the body itself, so callers do
//! not need to know up front which envelope version a client sent.

use crate::error::DecodeError;
use restaurant_types::review::{
    ADMISSION_REVIEW_KIND, ADMISSION_V1, ADMISSION_V1BETA1, APIEXTENSIONS_V1,
    APIEXTENSIONS_V1BETA1, CONVERSION_REVIEW_KIND,
};
use restaurant_types::pizza::PIZZA_KIND;
use restaurant_types::topping::TOPPING_KIND;
use restaurant_types::{
    AdmissionReview, ConversionReview, GroupVersionKind, PizzaObject, PizzaVersion, RawExtension,
    Topping,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// Rust-side types a registered kind decodes into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisteredKind {
    AdmissionReview,
    ConversionReview,
    Pizza,
    Topping,
}

/// A decoded object of any registered kind
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    AdmissionReview(AdmissionReview),
    ConversionReview(ConversionReview),
    Pizza(PizzaObject),
    Topping(Topping),
}

#[derive(Debug, Clone)]
pub struct Scheme {
    kinds: HashMap<GroupVersionKind, RegisteredKind>,
}

impl Default for Scheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheme {
    /// Scheme with both review envelopes in both versions and the restaurant types
    pub fn new() -> Self {
        let mut scheme = Self {
            kinds: HashMap::new(),
        };

        for api_version in [ADMISSION_V1, ADMISSION_V1BETA1] {
            scheme.register(api_version, ADMISSION_REVIEW_KIND, RegisteredKind::AdmissionReview);
        }
        for api_version in [APIEXTENSIONS_V1, APIEXTENSIONS_V1BETA1] {
            scheme.register(api_version, CONVERSION_REVIEW_KIND, RegisteredKind::ConversionReview);
        }
        for version in PizzaVersion::ALL {
            scheme.register(version.api_version(), PIZZA_KIND, RegisteredKind::Pizza);
        }
        scheme.register(
            PizzaVersion::V1alpha1.api_version(),
            TOPPING_KIND,
            RegisteredKind::Topping,
        );

        scheme
    }

    fn register(&mut self, api_version: &str, kind: &str, registered: RegisteredKind) {
        if let Some(gvk) = GroupVersionKind::from_api_version(api_version, kind) {
            self.kinds.insert(gvk, registered);
        }
    }

    pub fn recognizes(&self, gvk: &GroupVersionKind) -> bool {
        self.kinds.contains_key(gvk)
    }

    /// Identify and decode a generic value
    pub fn decode(&self, value: Value) -> Result<(Object, GroupVersionKind), DecodeError> {
        let gvk = type_of(&value)?;
        let registered = *self
            .kinds
            .get(&gvk)
            .ok_or_else(|| DecodeError::NotRegistered(gvk.clone()))?;

        let object = match registered {
            RegisteredKind::AdmissionReview => Object::AdmissionReview(typed(&gvk, value)?),
            RegisteredKind::ConversionReview => Object::ConversionReview(typed(&gvk, value)?),
            RegisteredKind::Topping => Object::Topping(typed(&gvk, value)?),
            RegisteredKind::Pizza => {
                Object::Pizza(PizzaObject::from_value(value).map_err(|e| DecodeError::Malformed {
                    gvk: gvk.clone(),
                    message: e.to_string(),
                })?)
            }
        };

        Ok((object, gvk))
    }

    /// Decode an object embedded in a review, which must be a pizza
    pub fn decode_pizza(&self, object: &RawExtension) -> Result<PizzaObject, DecodeError> {
        match object {
            RawExtension::Object(pizza) => Ok(pizza.clone()),
            RawExtension::Raw(value) => match self.decode(value.clone())? {
                (Object::Pizza(pizza), _) => Ok(pizza),
                (_, gvk) => Err(DecodeError::NotAPizza(gvk)),
            },
        }
    }
}

fn str_field<'a>(value: &'a Value, name: &str) -> Option<&'a str> {
    value
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn type_of(value: &Value) -> Result<GroupVersionKind, DecodeError> {
    let kind = str_field(value, "kind").ok_or(DecodeError::MissingKind)?;
    let api_version = str_field(value, "apiVersion").ok_or(DecodeError::MissingApiVersion)?;
    GroupVersionKind::from_api_version(api_version, kind)
        .ok_or_else(|| DecodeError::InvalidApiVersion(api_version.to_string()))
}

fn typed<T: DeserializeOwned>(gvk: &GroupVersionKind, value: Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|e| DecodeError::Malformed {
        gvk: gvk.clone(),
        message: e.to_string(),
    })
}
