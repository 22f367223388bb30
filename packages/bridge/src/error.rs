//! Error types for the bridge layer.

use ocbridge_runtime::RuntimeError;
use thiserror::Error;

/// Host-level classification of a bridge failure.
///
/// Callers that surface errors to a host language map these onto its
/// exception hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The value has a kind the operation cannot take.
    Type,
    /// The value has an acceptable kind but an unusable value.
    Value,
    /// The foreign runtime failed.
    Runtime,
}

/// Errors from converting values across the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Unsupported host type, unhashable set element, unstringifiable key,
    /// non-integer in an index collection, or a handle of the wrong kind.
    #[error("type error: {message}")]
    Type { message: String },

    /// Null or dead handle where one was required, or a host `None` given
    /// to a conversion that needs an object.
    #[error("value error: {message}")]
    Value { message: String },

    /// The runtime failed to allocate or to yield a primitive.
    #[error("runtime error: {message}")]
    Runtime {
        message: String,
        #[source]
        source: Option<RuntimeError>,
    },

    /// Nesting went past the configured depth limit.
    #[error("nesting exceeds depth limit of {limit}")]
    DepthLimit { limit: usize },
}

impl BridgeError {
    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        BridgeError::Type {
            message: message.into(),
        }
    }

    pub(crate) fn value_error(message: impl Into<String>) -> Self {
        BridgeError::Value {
            message: message.into(),
        }
    }

    pub(crate) fn runtime_error(message: impl Into<String>) -> Self {
        BridgeError::Runtime {
            message: message.into(),
            source: None,
        }
    }

    /// The host-level class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::Type { .. } => ErrorKind::Type,
            BridgeError::Value { .. } | BridgeError::DepthLimit { .. } => ErrorKind::Value,
            BridgeError::Runtime { .. } => ErrorKind::Runtime,
        }
    }
}

impl From<RuntimeError> for BridgeError {
    fn from(e: RuntimeError) -> Self {
        match e {
            RuntimeError::InvalidHandle => BridgeError::Value {
                message: e.to_string(),
            },
            RuntimeError::TypeMismatch { .. } => BridgeError::Type {
                message: e.to_string(),
            },
            other => BridgeError::Runtime {
                message: other.to_string(),
                source: Some(other),
            },
        }
    }
}

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
