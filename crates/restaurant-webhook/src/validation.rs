//! Topping reference validation

use crate::cache::ToppingLister;
use crate::error::{ReviewError, ValidationError};
use crate::scheme::Scheme;
use restaurant_types::{AdmissionRequest, AdmissionResponse, PizzaObject, Status};

/// Check that every topping a pizza names exists in the catalog.
///
/// Names are looked up in order and the first failure wins; names after it
/// are never looked up.
pub fn validate_pizza(pizza: &PizzaObject, toppings: &dyn ToppingLister) -> Result<(), ValidationError> {
    pizza.topping_names().try_for_each(|name| match toppings.get(name) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ValidationError::ToppingNotFound(name.to_string())),
        Err(source) => Err(ValidationError::Lookup {
            name: name.to_string(),
            source,
        }),
    })
}

fn validate(
    scheme: &Scheme,
    toppings: &dyn ToppingLister,
    request: &AdmissionRequest,
) -> Result<(), ReviewError> {
    let object = request.object.as_ref().ok_or(ReviewError::MissingObject)?;
    let pizza = scheme.decode_pizza(object)?;
    validate_pizza(&pizza, toppings)?;
    Ok(())
}

/// Answer a validating admission request.
///
/// The caller is responsible for checking that `toppings` has synced.
pub fn review_validation(
    scheme: &Scheme,
    toppings: &dyn ToppingLister,
    request: &AdmissionRequest,
) -> AdmissionResponse {
    match validate(scheme, toppings, request) {
        Ok(()) => {
            tracing::debug!(uid = %request.uid, name = ?request.name, "Pizza is valid");
            AdmissionResponse::allowed(&request.uid)
                .with_result(Status::success().with_message("pizza is valid"))
        }
        Err(e) => {
            tracing::info!(uid = %request.uid, name = ?request.name, error = %e, "Pizza rejected");
            AdmissionResponse::denied(&request.uid, Status::failure(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ToppingCache;
    use crate::error::CacheError;
    use restaurant_types::{v1alpha1, v1beta1, ObjectMeta, RawExtension, Topping};
    use std::sync::Mutex;

    /// Lister that records every lookup
    struct RecordingLister {
        known: Vec<&'static str>,
        lookups: Mutex<Vec<String>>,
    }

    impl ToppingLister for RecordingLister {
        fn has_synced(&self) -> bool {
            true
        }

        fn get(&self, name: &str) -> Result<Option<Topping>, CacheError> {
            self.lookups.lock().unwrap().push(name.to_string());
            Ok(self.known.iter().any(|known| *known == name).then(|| Topping::new(name)))
        }
    }

    fn pizza(toppings: &[&str]) -> PizzaObject {
        v1alpha1::Pizza::new(
            ObjectMeta::named("margherita").with_namespace("default"),
            toppings.iter().map(|t| t.to_string()).collect(),
        )
        .into()
    }

    fn catalog(names: &[&str]) -> ToppingCache {
        let cache = ToppingCache::new();
        cache.replace(names.iter().map(|n| Topping::new(*n)).collect());
        cache
    }

    #[test]
    fn test_validation_stops_at_first_missing_topping() {
        let lister = RecordingLister {
            known: vec!["a", "c"],
            lookups: Mutex::new(Vec::new()),
        };

        let err = validate_pizza(&pizza(&["a", "b", "c"]), &lister).unwrap_err();
        assert_eq!(err.to_string(), "topping \"b\" not found");
        assert_eq!(*lister.lookups.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_lookup_error_is_wrapped() {
        let err = validate_pizza(&pizza(&["tomato", ""]), &catalog(&["tomato"])).unwrap_err();
        assert!(matches!(err, ValidationError::Lookup { ref name, .. } if name.is_empty()));
    }

    #[test]
    fn test_v1beta1_toppings_are_checked_by_name() {
        let pizza: PizzaObject = v1beta1::Pizza::new(
            ObjectMeta::named("salami"),
            vec![v1beta1::PizzaTopping::new("salami", 3)],
        )
        .into();
        assert!(validate_pizza(&pizza, &catalog(&["salami"])).is_ok());
        assert!(validate_pizza(&pizza, &catalog(&["tomato"])).is_err());
    }

    #[test]
    fn test_review_reports_success_status() {
        let request = AdmissionRequest {
            uid: "705ab4f5-6393-11e8-b7cc-42010a800002".to_string(),
            object: Some(RawExtension::Object(pizza(&["tomato", "salami"]))),
            ..Default::default()
        };

        let response = review_validation(&Scheme::new(), &catalog(&["tomato", "salami"]), &request);
        assert!(response.allowed);
        assert_eq!(response.uid, request.uid);
        let result = response.result.unwrap();
        assert!(result.is_success());
        assert_eq!(result.message, "pizza is valid");
    }

    #[test]
    fn test_review_denies_unknown_topping() {
        let request = AdmissionRequest {
            uid: "u-1".to_string(),
            object: Some(RawExtension::Object(pizza(&["pineapple"]))),
            ..Default::default()
        };

        let response = review_validation(&Scheme::new(), &catalog(&["tomato"]), &request);
        assert!(!response.allowed);
        assert_eq!(response.result.unwrap().message, "topping \"pineapple\" not found");
    }

    #[test]
    fn test_review_denies_missing_object() {
        let request = AdmissionRequest {
            uid: "u-2".to_string(),
            ..Default::default()
        };

        let response = review_validation(&Scheme::new(), &catalog(&[]), &request);
        assert!(!response.allowed);
        assert_eq!(response.result.unwrap().message, "admission request carries no object");
    }
}
