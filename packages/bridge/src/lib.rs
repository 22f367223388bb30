//! Host value bridge.
//!
//! Converts between [`HostValue`], a garbage-collected value tree, and the
//! objects of a reference-counted foreign runtime reached through
//! [`ocbridge_runtime::Runtime`]:
//! - Primitives: text, numbers, booleans, byte buffers
//! - Collections: arrays, string-keyed dictionaries, sets
//! - Index collections: integer arrays, integer sets, integer pair maps
//! - Domain objects, through registered extension converters
//!
//! Everything handed back to the foreign side is an [`Owned`] guard, so
//! retain/release balancing holds on every path, including errors.
//!
//! # Example
//!
//! ```rust
//! use ocbridge::{Bridge, HostValue};
//! use ocbridge_memory_runtime::MemoryRuntime;
//!
//! let rt = MemoryRuntime::new();
//! let bridge = Bridge::new(&rt);
//!
//! let value = HostValue::dict([
//!     ("a".into(), 1.into()),
//!     ("b".into(), HostValue::list([2.into(), 3.into()])),
//! ]);
//! let foreign = bridge.to_foreign(&value).unwrap();
//! assert_eq!(bridge.from_foreign(foreign.handle()).unwrap(), value);
//! ```

pub use bytes::Bytes;
pub use num_complex::Complex64;

mod collections;
mod config;
mod dispatch;
mod error;
mod extension;
mod index;
pub mod primitives;
mod type_table;
mod value;

pub use collections::dict_key_text;
pub use config::{BridgeConfig, ConfigError};
pub use dispatch::Bridge;
pub use error::{BridgeError, ErrorKind, Result};
pub use extension::{
    Capability, DomainObject, ExtensionConverter, ExtensionRegistry, HandleBackedConverter,
    QuantityView,
};
pub use type_table::{TypeKind, TypeTable};
pub use value::HostValue;

// Re-export boundary types for convenience
pub use ocbridge_runtime::{ForeignTypeId, Handle, Owned, Runtime, RuntimeError};
