use std::any::Any;
use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tickerboard_core::ConfigError;
use tracing::error;

/// Body sent with every 500 so internals never reach the client.
pub const INTERNAL_ERROR_MESSAGE: &str = "Terjadi kesalahan pada server";

/// Route-level failures.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Holds the requested symbol, uppercased.
    #[error("Saham {0} tidak ditemukan")]
    NotFound(String),

    #[error(transparent)]
    Identifiers(#[from] ConfigError),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Identifiers(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::NotFound(_) => self.to_string(),
            Self::Identifiers(source) => {
                error!(error = %source, "identifier list unavailable");
                String::from(INTERNAL_ERROR_MESSAGE)
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Response for a request whose handler panicked.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: String::from(INTERNAL_ERROR_MESSAGE),
        }),
    )
        .into_response()
}

/// Server start-up and runtime failures mapped to exit codes.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server terminated: {0}")]
    Serve(#[source] std::io::Error),

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

impl ServerError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Bind { .. } => 2,
            Self::Serve(_) => 1,
            Self::Logging(_) => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_symbol() {
        let error = ApiError::NotFound(String::from("XYZ"));
        assert_eq!(error.to_string(), "Saham XYZ tidak ditemukan");
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn identifier_failures_are_internal() {
        let error = ApiError::from(ConfigError::malformed("missing 'data'"));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn panics_map_to_generic_500() {
        let response = panic_response(Box::new("index out of bounds"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
