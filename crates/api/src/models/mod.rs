//! Domain models for the API.

pub mod identity;
pub mod restaurant;

pub use identity::CurrentUser;
pub use restaurant::{NewRestaurant, RESERVED_FIELDS, Restaurant, UploadedImage};
