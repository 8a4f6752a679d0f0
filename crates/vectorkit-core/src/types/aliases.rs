//! Type aliases for shared state.
//!
//! All tool and history operations run synchronously on the UI thread, so
//! the scene graph handle given to each tool is a plain `Rc<RefCell<T>>`.
//!
//! ## Usage
//!
//! ```rust
//! use vectorkit_core::types::{shared, Shared};
//!
//! let counter: Shared<u32> = shared(0);
//! *counter.borrow_mut() += 1;
//! assert_eq!(*counter.borrow(), 1);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
///
/// Tools hold one of these to the host scene graph; the host and the tools
/// never borrow it across a user-gesture boundary.
pub type Shared<T> = Rc<RefCell<T>>;

/// Create a new `Shared<T>` from a value.
#[inline]
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}
