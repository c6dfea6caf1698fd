//! Admission and conversion review envelopes
//!
//! Both envelope kinds are served in two API versions whose fields are
//! identical, so a single struct per kind carries either version; the
//! `apiVersion` of the request is echoed back on the response.

use crate::meta::{GroupVersionKind, GroupVersionResource, Status};
use crate::pizza::PizzaObject;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub const ADMISSION_REVIEW_KIND: &str = "AdmissionReview";
pub const CONVERSION_REVIEW_KIND: &str = "ConversionReview";

pub const ADMISSION_V1: &str = "admission.k8s.io/v1";
pub const ADMISSION_V1BETA1: &str = "admission.k8s.io/v1beta1";
pub const APIEXTENSIONS_V1: &str = "apiextensions.k8s.io/v1";
pub const APIEXTENSIONS_V1BETA1: &str = "apiextensions.k8s.io/v1beta1";

/// An object embedded in a review.
///
/// Objects arrive as raw JSON; conversion results are attached already
/// decoded and are encoded together with the envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum RawExtension {
    Raw(Value),
    Object(PizzaObject),
}

impl RawExtension {
    /// JSON form of the embedded object
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            RawExtension::Raw(value) => Ok(value.clone()),
            RawExtension::Object(object) => object.to_value(),
        }
    }
}

impl Serialize for RawExtension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RawExtension::Raw(value) => value.serialize(serializer),
            RawExtension::Object(object) => object.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for RawExtension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(RawExtension::Raw)
    }
}

/// Operation that triggered an admission request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    #[default]
    Create,
    Update,
    Delete,
    Connect,
}

/// Patch encoding used in admission responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchType {
    #[serde(rename = "JSONPatch")]
    JsonPatch,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionReview {
    pub api_version: String,

    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<AdmissionRequest>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<AdmissionResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionRequest {
    /// Opaque identifier echoed back in the response
    pub uid: String,

    #[serde(default)]
    pub kind: GroupVersionKind,

    #[serde(default)]
    pub resource: GroupVersionResource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_resource: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_kind: Option<GroupVersionKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    pub operation: Operation,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub user_info: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<RawExtension>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_object: Option<RawExtension>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionResponse {
    pub uid: String,

    pub allowed: bool,

    /// Serialized as `status`, as on the wire
    #[serde(rename = "status", default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Status>,

    /// JSON Patch document, base64 encoded on the wire
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64_bytes")]
    pub patch: Option<Vec<u8>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_type: Option<PatchType>,
}

impl AdmissionResponse {
    pub fn allowed(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            allowed: true,
            ..Default::default()
        }
    }

    pub fn denied(uid: impl Into<String>, result: Status) -> Self {
        Self {
            uid: uid.into(),
            allowed: false,
            result: Some(result),
            ..Default::default()
        }
    }

    pub fn with_result(mut self, result: Status) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_json_patch(mut self, patch: Vec<u8>) -> Self {
        self.patch = Some(patch);
        self.patch_type = Some(PatchType::JsonPatch);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReview {
    pub api_version: String,

    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ConversionRequest>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ConversionResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub uid: String,

    #[serde(rename = "desiredAPIVersion")]
    pub desired_api_version: String,

    #[serde(default)]
    pub objects: Vec<RawExtension>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionResponse {
    pub uid: String,

    #[serde(rename = "convertedObjects", default)]
    pub converted_objects: Vec<RawExtension>,

    pub result: Status,
}

impl ConversionResponse {
    pub fn success(uid: impl Into<String>, converted_objects: Vec<RawExtension>) -> Self {
        Self {
            uid: uid.into(),
            converted_objects,
            result: Status::success(),
        }
    }

    pub fn failure(uid: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            converted_objects: Vec::new(),
            result: Status::failure(message),
        }
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|encoded| STANDARD.decode(encoded).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_admission_review_decode() {
        let review: AdmissionReview = serde_json::from_value(json!({
            "apiVersion": "admission.k8s.io/v1",
            "kind": "AdmissionReview",
            "request": {
                "uid": "705ab4f5-6393-11e8-b7cc-42010a800002",
                "kind": {"group": "restaurant.programming-kubernetes.info", "version": "v1alpha1", "kind": "Pizza"},
                "resource": {"group": "restaurant.programming-kubernetes.info", "version": "v1alpha1", "resource": "pizzas"},
                "name": "margherita",
                "namespace": "default",
                "operation": "CREATE",
                "userInfo": {"username": "admin"},
                "object": {"apiVersion": "restaurant.programming-kubernetes.info/v1alpha1", "kind": "Pizza"},
                "dryRun": false
            }
        }))
        .unwrap();

        let request = review.request.unwrap();
        assert_eq!(request.operation, Operation::Create);
        assert_eq!(request.kind.kind, "Pizza");
        assert!(matches!(request.object, Some(RawExtension::Raw(_))));
        assert!(request.old_object.is_none());
    }

    #[test]
    fn test_admission_response_patch_is_base64() {
        let response = AdmissionResponse::allowed("uid-1").with_json_patch(b"[]".to_vec());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({"uid": "uid-1", "allowed": true, "patch": "W10=", "patchType": "JSONPatch"})
        );

        let decoded: AdmissionResponse = serde_json::from_value(value).unwrap();
        assert_eq!(decoded.patch.as_deref(), Some(&b"[]"[..]));
    }

    #[test]
    fn test_admission_denial_carries_status() {
        let response = AdmissionResponse::denied("uid-4", Status::failure("topping \"x\" not found"));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "uid": "uid-4",
                "allowed": false,
                "status": {"status": "Failure", "message": "topping \"x\" not found"}
            })
        );
    }

    #[test]
    fn test_conversion_response_shape() {
        let response = ConversionResponse::failure("uid-2", "cannot convert a to b");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "uid": "uid-2",
                "convertedObjects": [],
                "result": {"status": "Failure", "message": "cannot convert a to b"}
            })
        );
    }

    #[test]
    fn test_conversion_request_decode() {
        let request: ConversionRequest = serde_json::from_value(json!({
            "uid": "uid-3",
            "desiredAPIVersion": "restaurant.programming-kubernetes.info/v1beta1",
            "objects": [{"kind": "Pizza"}, {"kind": "Pizza"}]
        }))
        .unwrap();
        assert_eq!(request.objects.len(), 2);
        assert_eq!(request.desired_api_version, "restaurant.programming-kubernetes.info/v1beta1");
    }
}
