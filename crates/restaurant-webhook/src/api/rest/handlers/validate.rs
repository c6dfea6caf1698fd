//! Validating admission handler

use crate::api::rest::review::{
    answer_admission, decode_envelope, encode_response, negotiate, unexpected_kind,
};
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::scheme::Object;
use crate::validation::review_validation;
use axum::{body::Bytes, extract::State, http::HeaderMap, response::Response};

/// Reject pizzas that reference unknown toppings.
///
/// Fails closed with 503 until the topping cache has completed its first list.
pub async fn validate_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    if !state.toppings.has_synced() {
        return Err(ApiError::NotReady("topping cache not synced yet".to_string()));
    }

    let negotiated = negotiate(&state.codecs, &headers)?;
    let (object, gvk) = decode_envelope(&state.codecs, negotiated.decoder, &body)?;
    let Object::AdmissionReview(mut review) = object else {
        return Err(unexpected_kind(&gvk));
    };

    answer_admission(&mut review, &gvk, |request| {
        review_validation(&state.codecs.scheme, state.toppings.as_ref(), request)
    });

    encode_response(negotiated.encoder, &review)
}
