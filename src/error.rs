//! Error types for the cache, the dispatcher and the demo service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::events::SubscriptionId;
use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Errors raised while constructing a cache.
///
/// Ordinary cache operations never fail: a missing or expired key is an
/// empty result, not an error.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalid constructor arguments (zero ttl or reap interval)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The background reaper needs a Tokio runtime to run on
    #[error("No Tokio runtime available to host the reaper task")]
    NoRuntime,
}

// == Dispatch Error Enum ==
/// Failures surfaced by [`Dispatcher::emit`](crate::events::Dispatcher::emit)
/// after every handler has run.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Exactly one handler failed; its error is the source
    #[error("Listener {subscription} for '{event}' failed")]
    ListenerFailure {
        event: String,
        subscription: SubscriptionId,
        #[source]
        source: anyhow::Error,
    },

    /// Several handlers failed; the first failure is kept as the source
    #[error("{count} listeners for '{event}' failed")]
    AggregateListenerFailure {
        event: String,
        count: usize,
        #[source]
        source: anyhow::Error,
    },
}

impl DispatchError {
    /// Number of handlers that failed during the emission.
    pub fn failure_count(&self) -> usize {
        match self {
            DispatchError::ListenerFailure { .. } => 1,
            DispatchError::AggregateListenerFailure { count, .. } => *count,
        }
    }

    /// The first underlying handler failure.
    pub fn first_failure(&self) -> &anyhow::Error {
        match self {
            DispatchError::ListenerFailure { source, .. }
            | DispatchError::AggregateListenerFailure { source, .. } => source,
        }
    }
}

// == Api Error Enum ==
/// Error type for the demo HTTP service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Key not found in cache (absent or expired)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A lifecycle listener failed while the request was being handled
    #[error(transparent)]
    Listener(#[from] DispatchError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Listener(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache construction.
pub type Result<T> = std::result::Result<T, CacheError>;
