//! Creating and reading the caller's own restaurant.
//!
//! # Creation order
//!
//! 1. The caller must not already own a restaurant.
//! 2. An image must be attached.
//! 3. The image must be JPEG, PNG, or GIF.
//! 4. The image is uploaded; only then is the record persisted.
//!
//! The first failing step ends the request. Ownership uniqueness is a
//! read-before-write check, so two concurrent creations for the same user can
//! both pass it. If persisting fails after a successful upload the uploaded
//! image is left orphaned on the image host.

use chrono::Utc;
use serde_json::{Map, Value};
use thiserror::Error;

use forkful_core::{ImageMimeType, ImageTypeError, UserId, to_data_uri};

use super::image_store::{ImageStore, ImageStoreError};
use crate::db::{RepositoryError, RestaurantStore};
use crate::models::{NewRestaurant, Restaurant, UploadedImage};

/// Errors from restaurant operations.
#[derive(Debug, Error)]
pub enum RestaurantError {
    /// The caller already owns a restaurant.
    #[error("user {0} already owns a restaurant")]
    AlreadyExists(UserId),

    /// No image was attached to the request.
    #[error("image file is required")]
    ImageRequired,

    /// The attached image has an unsupported MIME type.
    #[error(transparent)]
    InvalidImageType(#[from] ImageTypeError),

    /// The image host rejected or failed the upload.
    #[error("image upload failed: {0}")]
    Upload(#[from] ImageStoreError),

    /// The record store failed.
    #[error("restaurant store failed: {0}")]
    Store(#[from] RepositoryError),

    /// The caller has no restaurant.
    #[error("restaurant not found")]
    NotFound,
}

/// Create the caller's restaurant.
///
/// `fields` are stored as submitted, apart from the server-assigned keys.
///
/// # Errors
///
/// See [`RestaurantError`]; each variant corresponds to one step of the
/// creation order in the module docs.
pub async fn create_restaurant(
    store: &dyn RestaurantStore,
    images: &dyn ImageStore,
    owner: UserId,
    fields: Map<String, Value>,
    image: Option<UploadedImage>,
) -> Result<Restaurant, RestaurantError> {
    if store.find_by_owner(&owner).await?.is_some() {
        return Err(RestaurantError::AlreadyExists(owner));
    }

    let image = image.ok_or(RestaurantError::ImageRequired)?;
    let mime = ImageMimeType::parse(&image.content_type)?;

    let data_uri = to_data_uri(mime, &image.bytes);
    let stored = images.upload(&data_uri).await?;
    tracing::info!(user = %owner, image_url = %stored.url, "Uploaded restaurant image");

    let restaurant = NewRestaurant::new(owner, stored.url, Utc::now(), fields);
    let restaurant = store.insert(restaurant).await.inspect_err(|e| {
        tracing::warn!(
            error = %e,
            public_id = ?stored.public_id,
            "Restaurant insert failed after upload; image is orphaned"
        );
    })?;

    tracing::info!(restaurant_id = %restaurant.id, user = %restaurant.user, "Created restaurant");
    Ok(restaurant)
}

/// Fetch the caller's restaurant.
///
/// # Errors
///
/// Returns [`RestaurantError::NotFound`] if the caller owns none, or
/// [`RestaurantError::Store`] if the lookup fails.
pub async fn get_restaurant(
    store: &dyn RestaurantStore,
    owner: &UserId,
) -> Result<Restaurant, RestaurantError> {
    store
        .find_by_owner(owner)
        .await?
        .ok_or(RestaurantError::NotFound)
}
