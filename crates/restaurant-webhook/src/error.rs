//! Error types for restaurant-webhook

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use restaurant_types::{ConversionError, GroupVersionKind};
use thiserror::Error;

/// Process-level errors
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// Topping catalog source error
    #[error("Catalog source error: {0}")]
    Source(#[from] SourceError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transport-level errors, answered with a plain-text body instead of an envelope
#[derive(Debug, Error)]
pub enum ApiError {
    /// Undecodable body, unsupported media type or unexpected envelope
    #[error("{0}")]
    BadRequest(String),

    /// Topping cache has not completed its initial list
    #[error("{0}")]
    NotReady(String),

    /// Response could not be encoded
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

/// Errors turning wire bytes into registered objects
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Object 'Kind' is missing")]
    MissingKind,

    #[error("Object 'apiVersion' is missing")]
    MissingApiVersion,

    #[error("invalid apiVersion {0:?}")]
    InvalidApiVersion(String),

    #[error("no kind {:?} is registered for version {:?}", .0.kind, .0.api_version())]
    NotRegistered(GroupVersionKind),

    #[error("failed to decode {gvk}: {message}")]
    Malformed { gvk: GroupVersionKind, message: String },

    #[error("expected a Pizza, got {0}")]
    NotAPizza(GroupVersionKind),
}

/// Errors encoding a response body
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Read cache errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("invalid topping name {0:?}")]
    InvalidKey(String),
}

/// Topping list/watch source errors
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API server returned {code}: {message}")]
    Status { code: u16, message: String },

    #[error("failed to decode watch event: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("watch failed: {0}")]
    Watch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Topping reference checks
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("topping {0:?} not found")]
    ToppingNotFound(String),

    #[error("failed to lookup topping {name:?}: {source}")]
    Lookup {
        name: String,
        #[source]
        source: CacheError,
    },
}

/// Business failures reported inside the review response
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to serialize pizza: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("admission request carries no object")]
    MissingObject,
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for process operations
pub type WebhookResult<T> = Result<T, WebhookError>;
