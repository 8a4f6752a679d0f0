//! # VectorKit Core
//!
//! Core types and utilities shared by the VectorKit crates.
//! Provides the error hierarchy, object identifiers and the
//! single-threaded shared-handle aliases used to pass a scene graph
//! into interactive tools.

pub mod error;
pub mod types;

pub use error::{Error, GeometryError, HistoryError, Result, SceneError};

pub use types::{shared, ObjectId, Shared};
