//! Defaulting and JSON Patch generation

use crate::error::ReviewError;
use crate::scheme::Scheme;
use json_patch::Patch;
use restaurant_types::{AdmissionRequest, AdmissionResponse, PizzaObject, Status};
use serde_json::Value;

/// Default `pizza` and diff the result against the object as it was received.
///
/// The diff is taken against `original` rather than a re-encoded copy so that
/// fields this webhook does not model never show up in the patch.
pub fn default_patch(original: &Value, mut pizza: PizzaObject) -> Result<Patch, serde_json::Error> {
    pizza.apply_defaults();
    let defaulted = pizza.to_value()?;
    Ok(json_patch::diff(original, &defaulted))
}

/// Compute the encoded JSON Patch for a mutating admission request
pub fn mutate(scheme: &Scheme, request: &AdmissionRequest) -> Result<Vec<u8>, ReviewError> {
    let object = request.object.as_ref().ok_or(ReviewError::MissingObject)?;
    let original = object.to_value()?;
    let pizza = scheme.decode_pizza(object)?;

    let patch = default_patch(&original, pizza)?;
    tracing::debug!(uid = %request.uid, operations = patch.0.len(), "Computed defaulting patch");
    Ok(serde_json::to_vec(&patch)?)
}

/// Answer a mutating admission request. Defaulting never denies; only a
/// decode or encode failure does.
pub fn review_mutation(scheme: &Scheme, request: &AdmissionRequest) -> AdmissionResponse {
    match mutate(scheme, request) {
        Ok(patch) => AdmissionResponse::allowed(&request.uid).with_json_patch(patch),
        Err(e) => {
            tracing::warn!(uid = %request.uid, name = ?request.name, error = %e, "Defaulting failed");
            AdmissionResponse::denied(&request.uid, Status::failure(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restaurant_types::{PatchType, RawExtension};
    use serde_json::json;

    fn request(object: Value) -> AdmissionRequest {
        AdmissionRequest {
            uid: "b7a1e8b4-2f3c-4b0e-9c55-0d3f4f6f1a10".to_string(),
            object: Some(RawExtension::Raw(object)),
            ..Default::default()
        }
    }

    fn patched(object: &Value, response: &AdmissionResponse) -> Value {
        let patch: Patch = serde_json::from_slice(response.patch.as_deref().unwrap()).unwrap();
        let mut doc = object.clone();
        json_patch::patch(&mut doc, &patch).unwrap();
        doc
    }

    #[test]
    fn test_v1alpha1_empty_toppings_are_defaulted() {
        let object = json!({
            "apiVersion": "restaurant.programming-kubernetes.info/v1alpha1",
            "kind": "Pizza",
            "metadata": {"name": "plain", "namespace": "default"},
            "spec": {"toppings": []}
        });

        let response = review_mutation(&Scheme::new(), &request(object.clone()));
        assert!(response.allowed);
        assert_eq!(response.patch_type, Some(PatchType::JsonPatch));
        assert_eq!(
            patched(&object, &response)["spec"]["toppings"],
            json!(["tomato", "mozzarella", "salami"])
        );
    }

    #[test]
    fn test_v1beta1_empty_toppings_are_defaulted() {
        let object = json!({
            "apiVersion": "restaurant.programming-kubernetes.info/v1beta1",
            "kind": "Pizza",
            "metadata": {"name": "plain"},
            "spec": {}
        });

        let response = review_mutation(&Scheme::new(), &request(object.clone()));
        assert!(response.allowed);
        assert_eq!(
            patched(&object, &response)["spec"]["toppings"],
            json!([
                {"name": "tomato", "quantity": 1},
                {"name": "mozzarella", "quantity": 1},
                {"name": "salami", "quantity": 1}
            ])
        );
    }

    #[test]
    fn test_defaulting_is_idempotent() {
        let object = json!({
            "apiVersion": "restaurant.programming-kubernetes.info/v1alpha1",
            "kind": "Pizza",
            "metadata": {"name": "plain"},
            "spec": {"toppings": []}
        });
        let scheme = Scheme::new();

        let first = review_mutation(&scheme, &request(object.clone()));
        let defaulted = patched(&object, &first);

        let second = review_mutation(&scheme, &request(defaulted));
        let patch: Patch = serde_json::from_slice(second.patch.as_deref().unwrap()).unwrap();
        assert!(patch.0.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_left_alone() {
        let object = json!({
            "apiVersion": "restaurant.programming-kubernetes.info/v1alpha1",
            "kind": "Pizza",
            "metadata": {"name": "plain", "labels": {"oven": "stone"}, "resourceVersion": "42"},
            "spec": {"toppings": [], "crust": "thin"},
            "status": {"cost": 3.5, "baked": false},
            "futureField": {"a": 1}
        });

        let response = review_mutation(&Scheme::new(), &request(object.clone()));
        let operations: Vec<Value> = serde_json::from_slice(response.patch.as_deref().unwrap()).unwrap();
        assert!(!operations.is_empty());
        for op in &operations {
            let path = op["path"].as_str().unwrap();
            assert!(path.starts_with("/spec/toppings"), "unexpected patch path {path}");
        }

        let result = patched(&object, &response);
        assert_eq!(result["spec"]["crust"], "thin");
        assert_eq!(result["futureField"], json!({"a": 1}));
        assert_eq!(result["metadata"]["labels"]["oven"], "stone");

        let object = json!({
            "apiVersion": "restaurant.programming-kubernetes.info/v1beta1",
            "kind": "Pizza",
            "metadata": {"name": "diavola"},
            "spec": {"toppings": [{"name": "salami", "quantity": 2, "spicy": true}]}
        });
        let response = review_mutation(&Scheme::new(), &request(object));
        let patch: Patch = serde_json::from_slice(response.patch.as_deref().unwrap()).unwrap();
        assert!(response.allowed);
        assert!(patch.0.is_empty());
    }

    #[test]
    fn test_null_status_is_left_alone() {
        let object = json!({
            "apiVersion": "restaurant.programming-kubernetes.info/v1alpha1",
            "kind": "Pizza",
            "metadata": {"name": "salami"},
            "spec": {"toppings": ["salami"]},
            "status": null
        });

        let response = review_mutation(&Scheme::new(), &request(object));
        let patch: Patch = serde_json::from_slice(response.patch.as_deref().unwrap()).unwrap();
        assert!(response.allowed);
        assert!(patch.0.is_empty());
    }

    #[test]
    fn test_null_toppings_are_defaulted() {
        let object = json!({
            "apiVersion": "restaurant.programming-kubernetes.info/v1alpha1",
            "kind": "Pizza",
            "metadata": {"name": "plain"},
            "spec": {"toppings": null}
        });

        let response = review_mutation(&Scheme::new(), &request(object.clone()));
        assert!(response.allowed);
        let result = patched(&object, &response);
        assert_eq!(result["spec"]["toppings"], json!(["tomato", "mozzarella", "salami"]));
    }

    #[test]
    fn test_decode_failure_denies() {
        let object = json!({
            "apiVersion": "restaurant.programming-kubernetes.info/v1alpha1",
            "kind": "Pizza",
            "spec": {"toppings": "pepperoni"}
        });

        let response = review_mutation(&Scheme::new(), &request(object));
        assert!(!response.allowed);
        assert!(response.patch.is_none());
        assert!(!response.result.unwrap().is_success());
    }

    #[test]
    fn test_missing_object_denies() {
        let response = review_mutation(&Scheme::new(), &AdmissionRequest::default());
        assert!(!response.allowed);
        assert_eq!(response.result.unwrap().message, "admission request carries no object");
    }
}
