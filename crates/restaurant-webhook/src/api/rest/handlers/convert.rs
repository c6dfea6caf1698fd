//! Conversion webhook handler

use crate::api::rest::review::{decode_envelope, encode_response, negotiate, unexpected_kind};
use crate::api::rest::state::AppState;
use crate::conversion::review_conversion;
use crate::error::ApiResult;
use crate::scheme::Object;
use axum::{body::Bytes, extract::State, http::HeaderMap, response::Response};
use restaurant_types::ConversionResponse;

/// Convert pizzas between v1alpha1 and v1beta1
pub async fn convert_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let negotiated = negotiate(&state.codecs, &headers)?;
    let (object, gvk) = decode_envelope(&state.codecs, negotiated.decoder, &body)?;
    let Object::ConversionReview(mut review) = object else {
        return Err(unexpected_kind(&gvk));
    };

    let response = match review.request.take() {
        Some(request) => review_conversion(&state.codecs.scheme, &request),
        None => {
            tracing::error!(gvk = %gvk, "Conversion review carries no request");
            ConversionResponse::failure("", "conversion review carries no request")
        }
    };
    review.response = Some(response);

    encode_response(negotiated.encoder, &review)
}
