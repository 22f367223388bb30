//! Error types for the runtime boundary.
//!
//! These mirror the failure signals of the foreign API (NULL returns, false
//! returns, type checks). Host-level classification belongs in higher layers.

use thiserror::Error;

/// Errors reported across the runtime boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The runtime could not construct an object.
    ///
    /// Out-of-memory or an internal allocation failure.
    #[error("runtime failed to allocate {kind}")]
    AllocationFailed {
        /// Type name of the object that could not be created.
        kind: &'static str,
    },

    /// The handle does not refer to a live object.
    #[error("invalid handle")]
    InvalidHandle,

    /// The handle refers to an object of another kind.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// Type name the operation requires.
        expected: &'static str,
        /// Type name of the object actually referenced.
        found: String,
    },

    /// A number whose internal layout matches no known numeric layout.
    #[error("unresolvable numeric layout {layout} in {type_name}")]
    UnknownNumberLayout {
        /// Raw layout tag stored by the runtime.
        layout: u8,
        /// Type name of the object.
        type_name: String,
    },

    /// Element index past the end of a container.
    #[error("index {index} out of bounds for container of {count} elements")]
    IndexOutOfBounds { index: usize, count: usize },

    /// A caller-provided buffer is not sized to the container's count.
    #[error("buffer holds {found} slots but the container has {expected} entries")]
    BufferSizeMismatch { expected: usize, found: usize },

    /// Attempt to mutate a sealed container.
    #[error("{type_name} is immutable")]
    Immutable { type_name: String },
}

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
