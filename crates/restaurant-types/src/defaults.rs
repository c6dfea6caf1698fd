//! Defaulting of pizzas that arrive without toppings

use crate::pizza::{v1alpha1, v1beta1, PizzaObject};
use crate::v1beta1::PizzaTopping;

/// Toppings applied to a pizza that specifies none
pub const DEFAULT_TOPPINGS: [&str; 3] = ["tomato", "mozzarella", "salami"];

impl v1alpha1::Pizza {
    /// Returns true when the pizza was changed
    pub fn apply_defaults(&mut self) -> bool {
        if !self.spec.toppings.is_empty() {
            return false;
        }
        self.spec.toppings = DEFAULT_TOPPINGS.iter().map(|name| name.to_string()).collect();
        true
    }
}

impl v1beta1::Pizza {
    /// Returns true when the pizza was changed
    pub fn apply_defaults(&mut self) -> bool {
        if !self.spec.toppings.is_empty() {
            return false;
        }
        self.spec.toppings = DEFAULT_TOPPINGS
            .iter()
            .map(|name| PizzaTopping::new(*name, 1))
            .collect();
        true
    }
}

impl PizzaObject {
    pub fn apply_defaults(&mut self) -> bool {
        match self {
            PizzaObject::V1alpha1(pizza) => pizza.apply_defaults(),
            PizzaObject::V1beta1(pizza) => pizza.apply_defaults(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::ObjectMeta;

    #[test]
    fn test_alpha_defaults() {
        let mut pizza = v1alpha1::Pizza::new(ObjectMeta::named("plain"), vec![]);
        assert!(pizza.apply_defaults());
        assert_eq!(pizza.spec.toppings, vec!["tomato", "mozzarella", "salami"]);
        assert!(!pizza.apply_defaults());
    }

    #[test]
    fn test_beta_defaults() {
        let mut pizza = PizzaObject::from(v1beta1::Pizza::new(ObjectMeta::named("plain"), vec![]));
        assert!(pizza.apply_defaults());

        let PizzaObject::V1beta1(pizza) = pizza else {
            panic!("expected v1beta1 pizza");
        };
        assert_eq!(
            pizza.spec.toppings,
            vec![
                PizzaTopping::new("tomato", 1),
                PizzaTopping::new("mozzarella", 1),
                PizzaTopping::new("salami", 1),
            ]
        );
    }

    #[test]
    fn test_existing_toppings_untouched() {
        let mut pizza = v1alpha1::Pizza::new(ObjectMeta::named("marinara"), vec!["garlic".into()]);
        assert!(!pizza.apply_defaults());
        assert_eq!(pizza.spec.toppings, vec!["garlic"]);
    }
}
