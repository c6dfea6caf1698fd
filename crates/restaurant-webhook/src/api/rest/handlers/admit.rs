//! Mutating admission handler

use crate::api::rest::review::{
    answer_admission, decode_envelope, encode_response, negotiate, unexpected_kind,
};
use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use crate::mutation::review_mutation;
use crate::scheme::Object;
use axum::{body::Bytes, extract::State, http::HeaderMap, response::Response};

/// Default pizzas without toppings
pub async fn admit_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let negotiated = negotiate(&state.codecs, &headers)?;
    let (object, gvk) = decode_envelope(&state.codecs, negotiated.decoder, &body)?;
    let Object::AdmissionReview(mut review) = object else {
        return Err(unexpected_kind(&gvk));
    };

    answer_admission(&mut review, &gvk, |request| {
        review_mutation(&state.codecs.scheme, request)
    });

    encode_response(negotiated.encoder, &review)
}
