//! Authentication middleware and extractors.
//!
//! Users are authenticated by an upstream gateway, which forwards the
//! verified identity in a header (`API_IDENTITY_HEADER`, default
//! `x-user-id`). The API must only be reachable through that gateway.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use forkful_core::UserId;

use super::request_id::RequestId;
use crate::error::{AppError, set_sentry_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Middleware that turns the gateway's identity header into a [`CurrentUser`].
///
/// Requests without the header (or with an unusable value) pass through
/// unauthenticated; handlers that need a caller use [`RequireAuth`].
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = request
        .headers()
        .get(state.config().identity_header.as_str())
        .and_then(|h| h.to_str().ok())
        .and_then(|v| match UserId::parse(v) {
            Ok(id) => Some(id),
            Err(e) => {
                let request_id = request.extensions().get::<RequestId>();
                tracing::warn!(
                    error = %e,
                    request_id = request_id.map(RequestId::as_str),
                    "Ignoring malformed identity header"
                );
                None
            }
        });

    if let Some(id) = user {
        tracing::Span::current().record("user_id", id.as_str());
        set_sentry_user(&id);
        request.extensions_mut().insert(CurrentUser { id });
    }

    next.run(request).await
}

/// Extractor that requires an authenticated caller.
///
/// Rejects with `401 {"message": "Unauthorized"}` when no identity is present.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> String {
///     format!("Hello, {}!", user.id)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(Self)
            .ok_or(AppError::Unauthorized)
    }
}
