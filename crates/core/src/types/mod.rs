//! Core types for Forkful.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod image;
pub mod user;

pub use id::*;
pub use image::{ImageMimeType, ImageTypeError, to_data_uri};
pub use user::{UserId, UserIdError};
