//! Database operations for the API `PostgreSQL`.
//!
//! # Database: `forkful`
//!
//! ## Tables
//!
//! - `restaurants` - One profile per owning user (checked by the API, not a constraint)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p forkful-cli -- migrate
//! ```

pub mod restaurants;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use forkful_core::UserId;

use crate::models::{NewRestaurant, Restaurant};

pub use restaurants::PgRestaurantStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for restaurant records.
///
/// Implemented by [`PgRestaurantStore`] in production; tests substitute an
/// in-memory store.
#[async_trait]
pub trait RestaurantStore: Send + Sync {
    /// Find the restaurant owned by `user`, if any.
    async fn find_by_owner(&self, user: &UserId) -> Result<Option<Restaurant>, RepositoryError>;

    /// Persist a new restaurant and return it with its generated id.
    async fn insert(&self, restaurant: NewRestaurant) -> Result<Restaurant, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
