//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding. Every error renders as `{"message": "..."}` with
//! a fixed, client-safe message; details stay in logs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::RestaurantError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Restaurant operation failed.
    #[error("Restaurant error: {0}")]
    Restaurant(#[from] RestaurantError),

    /// Database operation failed outside a restaurant operation.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// No authenticated caller.
    #[error("Unauthorized")]
    Unauthorized,

    /// The multipart body could not be read.
    #[error("Invalid form data: {0}")]
    InvalidForm(String),

    /// The request body exceeded the upload limit.
    #[error("Payload too large")]
    PayloadTooLarge,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: &'static str,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Restaurant(err) => match err {
                RestaurantError::AlreadyExists(_) => StatusCode::CONFLICT,
                RestaurantError::ImageRequired | RestaurantError::InvalidImageType(_) => {
                    StatusCode::BAD_REQUEST
                }
                RestaurantError::NotFound => StatusCode::NOT_FOUND,
                RestaurantError::Upload(_) | RestaurantError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidForm(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Restaurant(err) => match err {
                RestaurantError::AlreadyExists(_) => "User restaurant already exists",
                RestaurantError::ImageRequired => "Image file is required",
                RestaurantError::InvalidImageType(_) => "Invalid image type",
                RestaurantError::Upload(_) => "Failed to upload image",
                RestaurantError::NotFound => "restaurant not found",
                RestaurantError::Store(_) => "Something went wrong.",
            },
            Self::Unauthorized => "Unauthorized",
            Self::InvalidForm(_) => "Invalid form data",
            Self::PayloadTooLarge => "Image file is too large",
            Self::Database(_) | Self::Internal(_) => "Something went wrong.",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        (
            status,
            Json(ErrorBody {
                message: self.message(),
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the authenticated caller.
pub fn set_sentry_user(user_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}
