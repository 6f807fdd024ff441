//! Integration tests for Forkful.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p forkful-cli -- migrate
//!
//! # Start the API with real Cloudinary credentials
//! cargo run -p forkful-api
//!
//! # Run the ignored integration tests
//! cargo test -p forkful-integration-tests -- --ignored
//! ```
//!
//! The API must be reachable at `API_BASE_URL` (default
//! `http://localhost:3000`) and must trust the `x-user-id` header, as it
//! does when `API_IDENTITY_HEADER` is left at its default.

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A fresh identity so runs don't collide with earlier data.
#[must_use]
pub fn unique_user() -> String {
    format!("it-{}", uuid::Uuid::new_v4())
}

/// A 1x1 transparent GIF.
pub const TINY_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
];
