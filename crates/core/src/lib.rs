//! Forkful Core - Shared types library.
//!
//! This crate provides common types used across all Forkful components:
//! - `api` - The restaurant owner HTTP API
//! - `cli` - Command-line tools for migrations
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, caller identities, and image MIME handling

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
