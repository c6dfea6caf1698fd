//! Topping catalog entries
//!
//! Toppings are cluster scoped and identified by name only. Their lifecycle is
//! owned by the API server; the webhook only reads them.

use crate::meta::ObjectMeta;
use crate::pizza::PizzaVersion;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Kind name of the topping resource
pub const TOPPING_KIND: &str = "Topping";

/// Kind name of a topping list response
pub const TOPPING_LIST_KIND: &str = "ToppingList";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topping {
    #[serde(default)]
    pub api_version: String,

    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: ToppingSpec,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Topping {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            api_version: PizzaVersion::V1alpha1.api_version().to_string(),
            kind: TOPPING_KIND.to_string(),
            metadata: ObjectMeta::named(name),
            spec: ToppingSpec::default(),
            extra: Map::new(),
        }
    }

    pub fn with_cost(mut self, cost: impl Into<Number>) -> Self {
        self.spec.cost = Some(cost.into());
        self
    }

    pub fn name(&self) -> &str {
        self.metadata.name()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToppingSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Number>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Metadata of a list response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_version: String,

    #[serde(default, rename = "continue", skip_serializing_if = "Option::is_none")]
    pub continue_token: Option<String>,
}

/// A full listing of the topping catalog at one resource version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToppingList {
    #[serde(default)]
    pub api_version: String,

    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub metadata: ListMeta,

    #[serde(default)]
    pub items: Vec<Topping>,
}

impl ToppingList {
    pub fn new(items: Vec<Topping>, resource_version: impl Into<String>) -> Self {
        Self {
            api_version: PizzaVersion::V1alpha1.api_version().to_string(),
            kind: TOPPING_LIST_KIND.to_string(),
            metadata: ListMeta {
                resource_version: resource_version.into(),
                continue_token: None,
            },
            items,
        }
    }

    pub fn resource_version(&self) -> &str {
        &self.metadata.resource_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_topping_list_decode() {
        let list: ToppingList = serde_json::from_value(json!({
            "apiVersion": "restaurant.programming-kubernetes.info/v1alpha1",
            "kind": "ToppingList",
            "metadata": {"resourceVersion": "1001"},
            "items": [
                {"metadata": {"name": "tomato"}, "spec": {"cost": 0.5}},
                {"metadata": {"name": "salami"}, "spec": {"cost": 1}}
            ]
        }))
        .unwrap();

        assert_eq!(list.resource_version(), "1001");
        let names: Vec<_> = list.items.iter().map(Topping::name).collect();
        assert_eq!(names, vec!["tomato", "salami"]);
    }

    #[test]
    fn test_topping_builder() {
        let topping = Topping::new("mozzarella").with_cost(2u64);
        assert_eq!(topping.name(), "mozzarella");
        assert_eq!(topping.kind, TOPPING_KIND);
        assert_eq!(topping.spec.cost, Some(Number::from(2u64)));
    }
}
