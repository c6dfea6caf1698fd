//! Shared plumbing for the review endpoints: negotiation, envelope decoding
//! and response encoding

use crate::codec::{Codec, Codecs};
use crate::error::{ApiError, ApiResult};
use crate::scheme::Object;
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName};
use axum::response::{IntoResponse, Response};
use restaurant_types::{AdmissionRequest, AdmissionResponse, AdmissionReview, GroupVersionKind, Status};
use serde::Serialize;

/// Codecs picked from the request headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Negotiated {
    pub decoder: Codec,
    pub encoder: Codec,
}

fn header(headers: &HeaderMap, name: HeaderName) -> &str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Pick the decoder from `Content-Type` and the encoder from `Accept`
pub fn negotiate(codecs: &Codecs, headers: &HeaderMap) -> ApiResult<Negotiated> {
    let content_type = header(headers, CONTENT_TYPE);
    let decoder = codecs
        .serializers
        .for_content_type(content_type)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid Content-Type header `{}`", content_type)))?;

    let accept = header(headers, ACCEPT);
    let encoder = codecs
        .serializers
        .for_accept(accept)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid Accept header `{}`", accept)))?;

    Ok(Negotiated { decoder, encoder })
}

/// Decode a request body and identify its kind through the scheme
pub fn decode_envelope(codecs: &Codecs, decoder: Codec, body: &[u8]) -> ApiResult<(Object, GroupVersionKind)> {
    let value = decoder.decode(body).map_err(deserialize_failed)?;
    codecs.scheme.decode(value).map_err(deserialize_failed)
}

fn deserialize_failed(err: impl std::fmt::Display) -> ApiError {
    ApiError::BadRequest(format!("failed to deserialize body: {}", err))
}

/// A registered kind arrived at an endpoint that does not handle it
pub fn unexpected_kind(gvk: &GroupVersionKind) -> ApiError {
    ApiError::BadRequest(format!("unexpected GroupVersionKind: {}", gvk))
}

/// Fill in the response of an admission review and drop its request
pub fn answer_admission<F>(review: &mut AdmissionReview, gvk: &GroupVersionKind, answer: F)
where
    F: FnOnce(&AdmissionRequest) -> AdmissionResponse,
{
    let response = match review.request.take() {
        Some(request) => answer(&request),
        None => {
            tracing::error!(gvk = %gvk, "Admission review carries no request");
            AdmissionResponse::denied("", Status::failure("admission review carries no request"))
        }
    };
    review.response = Some(response);
}

/// Encode a review with the negotiated encoder
pub fn encode_response<T: Serialize>(encoder: Codec, review: &T) -> ApiResult<Response> {
    let body = encoder
        .encode(review)
        .map_err(|e| ApiError::Internal(format!("failed to encode response: {}", e)))?;
    Ok(([(CONTENT_TYPE, encoder.media_type())], body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &str, accept: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        if let Some(accept) = accept {
            headers.insert(ACCEPT, HeaderValue::from_str(accept).unwrap());
        }
        headers
    }

    #[test]
    fn test_negotiate_defaults_encoder_to_json() {
        let negotiated = negotiate(&Codecs::new(), &headers("application/yaml", None)).unwrap();
        assert_eq!(negotiated.decoder, Codec::Yaml);
        assert_eq!(negotiated.encoder, Codec::Json);
    }

    #[test]
    fn test_negotiate_rejects_unknown_media_types() {
        let codecs = Codecs::new();

        let err = negotiate(&codecs, &headers("text/plain", None)).unwrap_err();
        assert_eq!(err.to_string(), "invalid Content-Type header `text/plain`");

        let err = negotiate(&codecs, &headers("application/json", Some("text/html"))).unwrap_err();
        assert_eq!(err.to_string(), "invalid Accept header `text/html`");
    }

    #[test]
    fn test_missing_request_is_answered() {
        let mut review = AdmissionReview {
            api_version: "admission.k8s.io/v1".to_string(),
            kind: "AdmissionReview".to_string(),
            ..Default::default()
        };
        let gvk = GroupVersionKind::new("admission.k8s.io", "v1", "AdmissionReview");

        answer_admission(&mut review, &gvk, |_| unreachable!());
        let response = review.response.unwrap();
        assert!(!response.allowed);
        assert_eq!(response.result.unwrap().message, "admission review carries no request");
    }
}
