//! Restaurant repository backed by `PostgreSQL`.
//!
//! Submitted restaurant fields are opaque to the API and stored as a JSONB
//! object. Queries are checked at runtime rather than with the `query!`
//! macros so the crate builds without a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;

use forkful_core::{RestaurantId, UserId};

use super::{RepositoryError, RestaurantStore};
use crate::models::{NewRestaurant, Restaurant};

/// Database row for `restaurants`.
#[derive(Debug, sqlx::FromRow)]
struct RestaurantRow {
    id: RestaurantId,
    user_id: UserId,
    fields: Json<Value>,
    image_url: String,
    last_updated: DateTime<Utc>,
}

impl TryFrom<RestaurantRow> for Restaurant {
    type Error = RepositoryError;

    fn try_from(row: RestaurantRow) -> Result<Self, Self::Error> {
        let Value::Object(fields) = row.fields.0 else {
            return Err(RepositoryError::DataCorruption(format!(
                "restaurant {} fields are not a JSON object",
                row.id
            )));
        };

        Ok(Self {
            id: row.id,
            user: row.user_id,
            image_url: row.image_url,
            last_updated: row.last_updated,
            fields,
        })
    }
}

/// `PostgreSQL` implementation of [`RestaurantStore`].
#[derive(Clone)]
pub struct PgRestaurantStore {
    pool: PgPool,
}

impl PgRestaurantStore {
    /// Create a new restaurant store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RestaurantStore for PgRestaurantStore {
    async fn find_by_owner(&self, user: &UserId) -> Result<Option<Restaurant>, RepositoryError> {
        let row = sqlx::query_as::<_, RestaurantRow>(
            r"
            SELECT id, user_id, fields, image_url, last_updated
            FROM restaurants
            WHERE user_id = $1
            ORDER BY created_at
            LIMIT 1
            ",
        )
        .bind(user)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Restaurant::try_from).transpose()
    }

    async fn insert(&self, restaurant: NewRestaurant) -> Result<Restaurant, RepositoryError> {
        let NewRestaurant {
            user,
            image_url,
            last_updated,
            fields,
        } = restaurant;

        let row = sqlx::query_as::<_, RestaurantRow>(
            r"
            INSERT INTO restaurants (user_id, fields, image_url, last_updated)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, fields, image_url, last_updated
            ",
        )
        .bind(&user)
        .bind(Json(Value::Object(fields)))
        .bind(&image_url)
        .bind(last_updated)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(restaurant_id = %row.id, user = %user, "Inserted restaurant");
        Restaurant::try_from(row)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
