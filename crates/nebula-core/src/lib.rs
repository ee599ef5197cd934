//! Core domain model for nebula-sound.
//!
//! This crate defines the song catalog row, its display projections, the
//! SQLite schema of the cleaned catalog artifact, and the in-memory
//! [`Catalog`] store the online service reads from.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod error;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod model;
pub mod schema;

pub use catalog::Catalog;
pub use error::{Error, Result};
