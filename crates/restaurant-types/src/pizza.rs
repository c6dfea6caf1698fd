//! Pizza resource in both served schema versions

use crate::meta::ObjectMeta;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// API group of the restaurant resources
pub const GROUP: &str = "restaurant.programming-kubernetes.info";

/// Kind name of the pizza resource
pub const PIZZA_KIND: &str = "Pizza";

/// Schema versions of the pizza resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PizzaVersion {
    /// Toppings as a list of names
    V1alpha1,
    /// Toppings as name/quantity pairs
    V1beta1,
}

impl PizzaVersion {
    pub const ALL: [PizzaVersion; 2] = [PizzaVersion::V1alpha1, PizzaVersion::V1beta1];

    /// Version part of the api version
    pub fn version(self) -> &'static str {
        match self {
            PizzaVersion::V1alpha1 => "v1alpha1",
            PizzaVersion::V1beta1 => "v1beta1",
        }
    }

    /// Full `group/version` string
    pub fn api_version(self) -> &'static str {
        match self {
            PizzaVersion::V1alpha1 => "restaurant.programming-kubernetes.info/v1alpha1",
            PizzaVersion::V1beta1 => "restaurant.programming-kubernetes.info/v1beta1",
        }
    }

    pub fn from_api_version(api_version: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|version| version.api_version() == api_version)
    }

    /// The only version this one converts to
    pub fn counterpart(self) -> Self {
        match self {
            PizzaVersion::V1alpha1 => PizzaVersion::V1beta1,
            PizzaVersion::V1beta1 => PizzaVersion::V1alpha1,
        }
    }
}

impl fmt::Display for PizzaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_version())
    }
}

/// Errors decoding a pizza from a generic JSON value
#[derive(Debug, Error)]
pub enum ObjectError {
    #[error("unknown Pizza apiVersion {0:?}")]
    UnknownVersion(String),

    #[error("expected kind Pizza, got {0:?}")]
    UnexpectedKind(String),

    #[error("malformed Pizza: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Read an explicit `null` the same way as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Tell an explicit `null` (`Some(None)`) apart from a missing field (`None`)
fn keep_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub mod v1alpha1 {
    //! `restaurant.programming-kubernetes.info/v1alpha1`

    use super::*;
    use serde_json::{Map, Number};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Pizza {
        pub api_version: String,

        pub kind: String,

        #[serde(default)]
        pub metadata: ObjectMeta,

        #[serde(default, deserialize_with = "super::null_as_default")]
        pub spec: PizzaSpec,

        /// `Some(None)` when the object was received with `"status": null`
        #[serde(
            default,
            deserialize_with = "super::keep_null",
            skip_serializing_if = "Option::is_none"
        )]
        pub status: Option<Option<PizzaStatus>>,

        #[serde(flatten)]
        pub extra: Map<String, Value>,
    }

    impl Pizza {
        pub fn new(metadata: ObjectMeta, toppings: Vec<String>) -> Self {
            Self {
                api_version: PizzaVersion::V1alpha1.api_version().to_string(),
                kind: PIZZA_KIND.to_string(),
                metadata,
                spec: PizzaSpec {
                    toppings,
                    extra: Map::new(),
                },
                status: None,
                extra: Map::new(),
            }
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct PizzaSpec {
        /// Topping names; order matters and a name may repeat
        #[serde(default, deserialize_with = "super::null_as_default")]
        pub toppings: Vec<String>,

        #[serde(flatten)]
        pub extra: Map<String, Value>,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct PizzaStatus {
        /// Cost as received; never recomputed here
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub cost: Option<Number>,

        #[serde(flatten)]
        pub extra: Map<String, Value>,
    }
}

pub mod v1beta1 {
    //! `restaurant.programming-kubernetes.info/v1beta1`

    use super::*;
    use serde_json::{Map, Number};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Pizza {
        pub api_version: String,

        pub kind: String,

        #[serde(default)]
        pub metadata: ObjectMeta,

        #[serde(default, deserialize_with = "super::null_as_default")]
        pub spec: PizzaSpec,

        /// `Some(None)` when the object was received with `"status": null`
        #[serde(
            default,
            deserialize_with = "super::keep_null",
            skip_serializing_if = "Option::is_none"
        )]
        pub status: Option<Option<PizzaStatus>>,

        #[serde(flatten)]
        pub extra: Map<String, Value>,
    }

    impl Pizza {
        pub fn new(metadata: ObjectMeta, toppings: Vec<PizzaTopping>) -> Self {
            Self {
                api_version: PizzaVersion::V1beta1.api_version().to_string(),
                kind: PIZZA_KIND.to_string(),
                metadata,
                spec: PizzaSpec {
                    toppings,
                    extra: Map::new(),
                },
                status: None,
                extra: Map::new(),
            }
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct PizzaSpec {
        /// Toppings with unique names, each with a quantity of at least one
        #[serde(default, deserialize_with = "super::null_as_default")]
        pub toppings: Vec<PizzaTopping>,

        #[serde(flatten)]
        pub extra: Map<String, Value>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct PizzaTopping {
        pub name: String,
        pub quantity: u32,

        #[serde(flatten)]
        pub extra: Map<String, Value>,
    }

    impl PizzaTopping {
        pub fn new(name: impl Into<String>, quantity: u32) -> Self {
            Self {
                name: name.into(),
                quantity,
                extra: Map::new(),
            }
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct PizzaStatus {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub cost: Option<Number>,

        #[serde(flatten)]
        pub extra: Map<String, Value>,
    }
}

/// A pizza in either schema version
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PizzaObject {
    V1alpha1(v1alpha1::Pizza),
    V1beta1(v1beta1::Pizza),
}

impl PizzaObject {
    /// Decode a pizza, picking the schema from its `apiVersion`
    pub fn from_value(value: Value) -> Result<Self, ObjectError> {
        let api_version = value
            .get("apiVersion")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let version = PizzaVersion::from_api_version(api_version)
            .ok_or_else(|| ObjectError::UnknownVersion(api_version.to_string()))?;

        let kind = value.get("kind").and_then(Value::as_str).unwrap_or_default();
        if kind != PIZZA_KIND {
            return Err(ObjectError::UnexpectedKind(kind.to_string()));
        }

        Ok(match version {
            PizzaVersion::V1alpha1 => PizzaObject::V1alpha1(serde_json::from_value(value)?),
            PizzaVersion::V1beta1 => PizzaObject::V1beta1(serde_json::from_value(value)?),
        })
    }

    pub fn version(&self) -> PizzaVersion {
        match self {
            PizzaObject::V1alpha1(_) => PizzaVersion::V1alpha1,
            PizzaObject::V1beta1(_) => PizzaVersion::V1beta1,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            PizzaObject::V1alpha1(pizza) => &pizza.metadata,
            PizzaObject::V1beta1(pizza) => &pizza.metadata,
        }
    }

    /// Topping names in spec order. v1alpha1 repeats are yielded every time.
    pub fn topping_names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            PizzaObject::V1alpha1(pizza) => {
                Box::new(pizza.spec.toppings.iter().map(String::as_str))
            }
            PizzaObject::V1beta1(pizza) => {
                Box::new(pizza.spec.toppings.iter().map(|t| t.name.as_str()))
            }
        }
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl From<v1alpha1::Pizza> for PizzaObject {
    fn from(pizza: v1alpha1::Pizza) -> Self {
        PizzaObject::V1alpha1(pizza)
    }
}

impl From<v1beta1::Pizza> for PizzaObject {
    fn from(pizza: v1beta1::Pizza) -> Self {
        PizzaObject::V1beta1(pizza)
    }
}
