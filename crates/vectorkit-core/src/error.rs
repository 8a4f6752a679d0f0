//! Error handling for VectorKit
//!
//! Provides error types for all layers of the editing kernel:
//! - Geometry errors (degenerate transforms and inputs)
//! - Scene errors (host scene graph lookups and serialization)
//! - History errors (snapshot indexing, compression, reconstruction)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::types::ObjectId;

/// Geometry error type
///
/// Raised by coordinate transforms and path construction when the input
/// cannot produce a meaningful result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The object's transform matrix has no inverse (zero scale on an axis)
    #[error("Transform of object {id} is not invertible (determinant {determinant})")]
    NonInvertibleTransform {
        /// The object whose matrix could not be inverted.
        id: ObjectId,
        /// The determinant that was found.
        determinant: f64,
    },

    /// Text-on-path was asked to lay out an empty string
    #[error("Cannot place empty text on a path")]
    EmptyText,

    /// The object kind cannot be sampled as a path
    #[error("Object {id} cannot be sampled as a path")]
    NotSampleable {
        /// The offending object.
        id: ObjectId,
    },
}

/// Scene graph error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Lookup by id failed
    #[error("Object {id} not found in scene")]
    ObjectNotFound {
        /// The id that was looked up.
        id: ObjectId,
    },

    /// Object kind does not support the requested operation
    #[error("Object {id} does not support {operation}")]
    Unsupported {
        /// The object id.
        id: ObjectId,
        /// The operation that was attempted.
        operation: String,
    },

    /// Serializing the scene failed
    #[error("Failed to serialize scene: {reason}")]
    Serialization {
        /// The reason for the failure.
        reason: String,
    },

    /// Loading a serialized scene failed
    #[error("Failed to load scene: {reason}")]
    Deserialization {
        /// The reason for the failure.
        reason: String,
    },
}

/// History error type
///
/// Represents failures while capturing or restoring snapshots.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistoryError {
    /// Requested step is outside the recorded sequence
    #[error("History step {step} out of range (history length {len})")]
    InvalidStep {
        /// The requested step.
        step: usize,
        /// Number of recorded entries.
        len: usize,
    },

    /// Snapshot payload could not be decoded
    #[error("Snapshot {step} is corrupted: {reason}")]
    Corrupted {
        /// The index of the snapshot.
        step: usize,
        /// What went wrong.
        reason: String,
    },

    /// A differential snapshot points at something other than a full snapshot
    #[error("Differential snapshot {step} has invalid base {base}")]
    BrokenDiffChain {
        /// The index of the differential snapshot.
        step: usize,
        /// The base index it refers to.
        base: usize,
    },

    /// Compressing a payload failed
    #[error("Compression failed: {reason}")]
    Compression {
        /// The reason for the failure.
        reason: String,
    },

    /// A persisted record could not be accepted
    #[error("Invalid snapshot record {index}: {reason}")]
    InvalidRecord {
        /// Position of the record in the persisted list.
        index: usize,
        /// Why the record was rejected.
        reason: String,
    },
}

/// Main error type for VectorKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Scene error
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// History error
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is a scene error
    pub fn is_scene_error(&self) -> bool {
        matches!(self, Error::Scene(_))
    }

    /// Check if this is a history error
    pub fn is_history_error(&self) -> bool {
        matches!(self, Error::History(_))
    }

    /// Check if this error means a stored snapshot cannot be restored
    pub fn is_unrecoverable_snapshot(&self) -> bool {
        matches!(
            self,
            Error::History(HistoryError::Corrupted { .. })
                | Error::History(HistoryError::BrokenDiffChain { .. })
        )
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
