//! Type system utilities and aliases.
//!
//! ## Modules
//!
//! - [`aliases`]: Shared-handle aliases for single-threaded state (`Rc<RefCell<T>>`).
//! - [`id`]: Scene object identifiers.

pub mod aliases;
pub mod id;

pub use aliases::*;
pub use id::ObjectId;
