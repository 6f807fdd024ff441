//! HTTP middleware stack for the API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Identity (trust the gateway's user header)

pub mod auth;
pub mod request_id;

pub use auth::{RequireAuth, identity_middleware};
pub use request_id::{RequestId, request_id_middleware};
