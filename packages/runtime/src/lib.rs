//! Foreign runtime boundary.
//!
//! This is the narrow waist of the bridge. Everything at this level is an
//! opaque handle into a reference-counted object universe - no host values,
//! no recursion, no interpretation beyond what the runtime itself reports.
//!
//! Use this layer for:
//! - Implementing a binding to a concrete foreign runtime
//! - Holding foreign objects with exact retain/release balancing
//! - Asking the runtime what kind of object a handle refers to
//!
//! # Ownership
//!
//! Functions that create a foreign object hand back a reference the caller
//! owns and must release exactly once. Wrap it in [`Owned`] immediately:
//!
//! ```rust
//! use ocbridge_runtime::{Owned, Runtime, RuntimeError};
//!
//! fn make_greeting(rt: &dyn Runtime) -> Result<Owned<'_>, RuntimeError> {
//!     let raw = rt.string_create("hello", false)?;
//!     Ok(Owned::adopt(rt, raw))
//! }
//! ```
//!
//! Functions that only read hand back borrowed handles (plain [`Handle`]
//! values) that must never be released by the reader.

mod error;
mod handle;
mod owned;
mod traits;
mod types;

pub use error::{Result, RuntimeError};
pub use handle::Handle;
pub use owned::Owned;
pub use traits::Runtime;
pub use types::{type_names, ForeignTypeId, Number, TypeDescriptor};

pub use num_complex::{Complex32, Complex64};
