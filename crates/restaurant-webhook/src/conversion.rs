//! Batch conversion of pizzas between schema versions

use crate::error::ReviewError;
use crate::scheme::Scheme;
use restaurant_types::{ConversionRequest, ConversionResponse, RawExtension};

/// Convert every object to `desired_api_version`, preserving order.
///
/// The first object that fails to decode or convert fails the whole batch.
pub fn convert_objects(
    scheme: &Scheme,
    objects: &[RawExtension],
    desired_api_version: &str,
) -> Result<Vec<RawExtension>, ReviewError> {
    objects
        .iter()
        .map(|object| {
            let pizza = scheme.decode_pizza(object)?;
            let converted = pizza.convert_to(desired_api_version)?;
            Ok(RawExtension::Object(converted))
        })
        .collect()
}

/// Answer a conversion request
pub fn review_conversion(scheme: &Scheme, request: &ConversionRequest) -> ConversionResponse {
    match convert_objects(scheme, &request.objects, &request.desired_api_version) {
        Ok(converted) => {
            tracing::debug!(
                uid = %request.uid,
                count = converted.len(),
                desired = %request.desired_api_version,
                "Converted pizzas"
            );
            ConversionResponse::success(&request.uid, converted)
        }
        Err(e) => {
            tracing::warn!(
                uid = %request.uid,
                desired = %request.desired_api_version,
                error = %e,
                "Conversion failed"
            );
            ConversionResponse::failure(&request.uid, e.to_string())
        }
    }
}
