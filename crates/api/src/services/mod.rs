//! Business logic services.
//!
//! - [`image_store`] - Image host seam and its error type
//! - [`cloudinary`] - Cloudinary implementation of the image host
//! - [`restaurants`] - Creating and reading the caller's restaurant

pub mod cloudinary;
pub mod image_store;
pub mod restaurants;

pub use cloudinary::CloudinaryClient;
pub use image_store::{ImageStore, ImageStoreError, StoredImage};
pub use restaurants::RestaurantError;
