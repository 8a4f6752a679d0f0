//! # VectorKit
//!
//! A vector-scene editing kernel: interactive geometry tools and a
//! compressed undo/redo history for 2D scene graphs.
//!
//! ## Architecture
//!
//! VectorKit is organized as a workspace with multiple crates:
//!
//! 1. **vectorkit-core** - Error hierarchy, object ids, shared scene handles
//! 2. **vectorkit-settings** - Tool and history configuration (TOML/JSON)
//! 3. **vectorkit-designer** - Scene model, tools, history and persistence
//! 4. **vectorkit** - This crate; re-exports the above and ships a history
//!    inspection binary
//!
//! ## Features
//!
//! - **Eraser**: Strokes become object-relative clip masks that follow
//!   their object through later transforms
//! - **Text on path**: Characters laid out along circles, ellipses and paths
//! - **Membrane brush**: Decorations stamped evenly along freehand strokes
//! - **Right-angle arrow**: Three-click elbow connectors with arrowheads
//! - **History**: Full and differential snapshots, bounded, persistable

pub use vectorkit_core as core;
pub use vectorkit_designer as designer;
pub use vectorkit_settings as settings;

pub use vectorkit_core::{Error, GeometryError, HistoryError, ObjectId, Result, SceneError};

pub use vectorkit_designer::{
    EditorState, HistoryManager, JsonFileStore, MemoryStore, Scene, SceneGraph, SceneObject,
    SnapshotRecord, SnapshotStore, ToolKind,
};

pub use vectorkit_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr
/// - RUST_LOG environment variable support, `info` when unset
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
