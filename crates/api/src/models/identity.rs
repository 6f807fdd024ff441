//! Caller identity attached to authenticated requests.

use forkful_core::UserId;

/// The authenticated caller.
///
/// Inserted into request extensions by
/// [`identity_middleware`](crate::middleware::identity_middleware) and read
/// back by [`RequireAuth`](crate::middleware::RequireAuth).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Identity issued by the upstream identity provider.
    pub id: UserId,
}
