//! Conversion between the pizza schema versions
//!
//! v1alpha1 -> v1beta1 aggregates repeated names into quantities, keeping the
//! order in which each name was first seen. v1beta1 -> v1alpha1 expands every
//! entry into `quantity` consecutive names.
//!
//! The aggregation is lossy: `["a", "b", "a"]` becomes `[{a, 2}, {b, 1}]` and
//! expands back to `["a", "a", "b"]`. The opposite direction is exact for
//! well-formed v1beta1 toppings.

use crate::pizza::{v1alpha1, v1beta1, PizzaObject, PizzaVersion};
use crate::v1beta1::PizzaTopping;
use std::collections::HashMap;
use thiserror::Error;

/// Upper bound on the number of names a v1beta1 pizza may expand into
pub const MAX_EXPANDED_TOPPINGS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("cannot convert {from} to {to}")]
    Unsupported { from: String, to: String },

    #[error("toppings expand to more than {max} entries")]
    TooManyToppings { max: u64 },
}

/// Collapse topping names into `(name, quantity)` pairs in first-occurrence order
pub fn aggregate<S: AsRef<str>>(names: &[S]) -> Vec<PizzaTopping> {
    let mut toppings: Vec<PizzaTopping> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for name in names {
        let name = name.as_ref();
        if let Some(&i) = index.get(name) {
            toppings[i].quantity += 1;
            continue;
        }
        index.insert(name, toppings.len());
        toppings.push(PizzaTopping::new(name, 1));
    }

    toppings
}

/// Repeat each topping name `quantity` times, in entry order.
///
/// Fails when the quantities add up to more than [`MAX_EXPANDED_TOPPINGS`].
pub fn expand(toppings: &[PizzaTopping]) -> Result<Vec<String>, ConversionError> {
    let total = toppings
        .iter()
        .try_fold(0u64, |total, topping| total.checked_add(u64::from(topping.quantity)))
        .filter(|total| *total <= MAX_EXPANDED_TOPPINGS)
        .ok_or(ConversionError::TooManyToppings {
            max: MAX_EXPANDED_TOPPINGS,
        })?;

    let mut names = Vec::with_capacity(total as usize);
    for topping in toppings {
        names.extend(std::iter::repeat(topping.name.clone()).take(topping.quantity as usize));
    }
    Ok(names)
}

impl PizzaObject {
    /// Convert to `api_version`, which must be the other served version.
    ///
    /// Metadata, status and unmodelled fields are carried as they are; only
    /// `apiVersion` and the toppings change.
    pub fn convert_to(self, api_version: &str) -> Result<PizzaObject, ConversionError> {
        let from = self.version();
        if api_version != from.counterpart().api_version() {
            return Err(ConversionError::Unsupported {
                from: from.api_version().to_string(),
                to: api_version.to_string(),
            });
        }

        match self {
            PizzaObject::V1alpha1(pizza) => Ok(PizzaObject::V1beta1(to_v1beta1(pizza))),
            PizzaObject::V1beta1(pizza) => to_v1alpha1(pizza).map(PizzaObject::V1alpha1),
        }
    }
}

fn to_v1beta1(pizza: v1alpha1::Pizza) -> v1beta1::Pizza {
    v1beta1::Pizza {
        api_version: PizzaVersion::V1beta1.api_version().to_string(),
        kind: pizza.kind,
        metadata: pizza.metadata,
        spec: v1beta1::PizzaSpec {
            toppings: aggregate(&pizza.spec.toppings),
            extra: pizza.spec.extra,
        },
        status: pizza.status.map(|status| {
            status.map(|status| v1beta1::PizzaStatus {
                cost: status.cost,
                extra: status.extra,
            })
        }),
        extra: pizza.extra,
    }
}

fn to_v1alpha1(pizza: v1beta1::Pizza) -> Result<v1alpha1::Pizza, ConversionError> {
    Ok(v1alpha1::Pizza {
        api_version: PizzaVersion::V1alpha1.api_version().to_string(),
        kind: pizza.kind,
        metadata: pizza.metadata,
        spec: v1alpha1::PizzaSpec {
            toppings: expand(&pizza.spec.toppings)?,
            extra: pizza.spec.extra,
        },
        status: pizza.status.map(|status| {
            status.map(|status| v1alpha1::PizzaStatus {
                cost: status.cost,
                extra: status.extra,
            })
        }),
        extra: pizza.extra,
    })
}
