//! The generic dispatcher.

use ocbridge_runtime::{Handle, Owned, Runtime};

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::extension::ExtensionRegistry;
use crate::primitives;
use crate::type_table::{TypeKind, TypeTable};
use crate::value::HostValue;

/// Converts host values to and from one runtime.
///
/// A `Bridge` borrows its runtime, so every owned handle it hands out is
/// tied to that runtime's lifetime.
///
/// ```rust
/// use ocbridge::{Bridge, HostValue};
/// use ocbridge_memory_runtime::MemoryRuntime;
///
/// let rt = MemoryRuntime::new();
/// let bridge = Bridge::new(&rt);
///
/// let value = HostValue::list([1.into(), "a".into()]);
/// let foreign = bridge.to_foreign(&value).unwrap();
/// assert_eq!(bridge.from_foreign(foreign.handle()).unwrap(), value);
/// ```
pub struct Bridge<'rt> {
    pub(crate) runtime: &'rt dyn Runtime,
    types: TypeTable,
    pub(crate) extensions: ExtensionRegistry,
    pub(crate) config: BridgeConfig,
}

impl<'rt> Bridge<'rt> {
    /// Create a bridge with no extensions and the default config.
    pub fn new(runtime: &'rt dyn Runtime) -> Self {
        Self::with_config(runtime, ExtensionRegistry::new(), BridgeConfig::default())
    }

    pub fn with_extensions(runtime: &'rt dyn Runtime, extensions: ExtensionRegistry) -> Self {
        Self::with_config(runtime, extensions, BridgeConfig::default())
    }

    pub fn with_config(
        runtime: &'rt dyn Runtime,
        extensions: ExtensionRegistry,
        config: BridgeConfig,
    ) -> Self {
        let types = TypeTable::build(runtime, &extensions);
        Self {
            runtime,
            types,
            extensions,
            config,
        }
    }

    pub fn runtime(&self) -> &'rt dyn Runtime {
        self.runtime
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    /// Identify a borrowed handle.
    pub fn identify(&self, handle: Handle) -> Result<TypeKind> {
        self.types.identify(self.runtime, handle)
    }

    /// Convert a host value into an owned foreign object.
    ///
    /// # Errors
    ///
    /// - `Value` for `HostValue::None`, which has no foreign counterpart
    /// - `Type` for handle tokens and objects no extension converts
    /// - `DepthLimit` when containers nest past `max_depth`
    pub fn to_foreign(&self, value: &HostValue) -> Result<Owned<'rt>> {
        self.to_foreign_at(value, 0)
    }

    pub(crate) fn to_foreign_at(&self, value: &HostValue, depth: usize) -> Result<Owned<'rt>> {
        let rt = self.runtime;
        match value {
            HostValue::None => Err(BridgeError::value_error(
                "None has no foreign representation",
            )),
            HostValue::Bool(b) => Ok(primitives::bool_to_foreign(rt, *b)),
            HostValue::Int(i) => primitives::int_to_foreign(rt, *i),
            HostValue::Float(x) => primitives::float_to_foreign(rt, *x),
            HostValue::Complex(c) => primitives::complex_to_foreign(rt, *c),
            HostValue::Text(s) => primitives::text_to_foreign(rt, s),
            HostValue::Bytes(b) => primitives::bytes_to_foreign(rt, b),
            HostValue::List(items) => self.list_to_foreign_at(items, depth),
            HostValue::Dict(entries) => self.dict_to_foreign_at(entries, depth),
            HostValue::Set(items) => self.set_to_foreign_at(items, depth),
            HostValue::Object(obj) => self.extensions.to_foreign(rt, obj.as_ref()),
            HostValue::Handle(token) => Err(BridgeError::type_error(format!(
                "handle token {:#x} cannot be converted back to a foreign object",
                token
            ))),
        }
    }

    /// Convert a borrowed foreign handle into a host value.
    ///
    /// A null handle (`None`) converts to `HostValue::None`. Handles of types
    /// the bridge does not know come back as `HostValue::Handle` tokens.
    pub fn from_foreign(&self, handle: impl Into<Option<Handle>>) -> Result<HostValue> {
        match handle.into() {
            Some(handle) => self.from_foreign_at(handle, 0),
            None => Ok(HostValue::None),
        }
    }

    pub(crate) fn from_foreign_at(&self, handle: Handle, depth: usize) -> Result<HostValue> {
        let rt = self.runtime;
        let value = match self.identify(handle)? {
            TypeKind::Text | TypeKind::MutableText => {
                HostValue::Text(primitives::foreign_to_text(rt, handle)?)
            }
            TypeKind::Number => primitives::foreign_to_number(rt, handle)?,
            TypeKind::Boolean => HostValue::Bool(primitives::foreign_to_bool(rt, handle)?),
            TypeKind::Data | TypeKind::MutableData => {
                HostValue::Bytes(primitives::foreign_to_bytes(rt, handle)?)
            }
            TypeKind::Array | TypeKind::MutableArray => {
                HostValue::List(self.foreign_to_list_at(handle, depth)?)
            }
            TypeKind::Dictionary | TypeKind::MutableDictionary => {
                HostValue::Dict(self.foreign_to_dict_at(handle, depth)?)
            }
            TypeKind::Set | TypeKind::MutableSet => {
                HostValue::Set(self.foreign_to_set_at(handle, depth)?)
            }
            TypeKind::IndexArray | TypeKind::MutableIndexArray => HostValue::List(
                self.foreign_to_index_array(handle)?
                    .into_iter()
                    .map(HostValue::Int)
                    .collect(),
            ),
            TypeKind::IndexSet | TypeKind::MutableIndexSet => HostValue::Set(
                self.foreign_to_index_set(handle)?
                    .into_iter()
                    .map(HostValue::Int)
                    .collect(),
            ),
            TypeKind::IndexPairSet | TypeKind::MutableIndexPairSet => HostValue::Dict(
                self.foreign_to_index_pair_map(handle)?
                    .into_iter()
                    .map(|(k, v)| (HostValue::Int(k), HostValue::Int(v)))
                    .collect(),
            ),
            TypeKind::Extension(index) => match self.extensions.get(index) {
                Some(converter) => converter.from_foreign(rt, handle)?,
                None => HostValue::Handle(handle.token()),
            },
            TypeKind::Unknown(id) => {
                tracing::debug!(type_id = %id, ?handle, "unknown foreign type, returning token");
                HostValue::Handle(handle.token())
            }
        };
        Ok(value)
    }

    /// Step one container level deeper, failing past the configured limit.
    pub(crate) fn descend(&self, depth: usize) -> Result<usize> {
        if depth >= self.config.max_depth {
            return Err(BridgeError::DepthLimit {
                limit: self.config.max_depth,
            });
        }
        Ok(depth + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use num_complex::Complex64;
    use ocbridge_memory_runtime::MemoryRuntime;

    #[test]
    fn scalars_round_trip() {
        let rt = MemoryRuntime::new();
        let bridge = Bridge::new(&rt);
        for value in [
            HostValue::Int(0),
            HostValue::Int(2_147_483_647),
            HostValue::Int(2_147_483_648),
            HostValue::Int(-2_147_483_649),
            HostValue::Float(3.25),
            HostValue::Complex(Complex64::new(1.0, 2.0)),
            HostValue::Bool(true),
            HostValue::Bool(false),
            HostValue::Text("ünïcødé".to_string()),
            HostValue::Text(String::new()),
            HostValue::Bytes(bytes::Bytes::from_static(b"raw")),
        ] {
            let foreign = bridge.to_foreign(&value).unwrap();
            assert_eq!(bridge.from_foreign(foreign.handle()).unwrap(), value);
        }
        assert_eq!(rt.live_objects(), 2);
    }

    #[test]
    fn none_is_a_value_error() {
        let rt = MemoryRuntime::new();
        let bridge = Bridge::new(&rt);
        let err = bridge.to_foreign(&HostValue::None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn null_handle_is_none() {
        let rt = MemoryRuntime::new();
        let bridge = Bridge::new(&rt);
        assert_eq!(bridge.from_foreign(None).unwrap(), HostValue::None);
        let null = Handle::from_raw(std::ptr::null_mut());
        assert_eq!(bridge.from_foreign(null).unwrap(), HostValue::None);
    }

    #[test]
    fn tokens_are_not_rewrapped() {
        let rt = MemoryRuntime::new();
        let bridge = Bridge::new(&rt);
        let err = bridge.to_foreign(&HostValue::Handle(0x1000)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert_eq!(rt.allocations(), 0);
    }

    #[test]
    fn dead_handle_is_a_value_error() {
        let rt = MemoryRuntime::new();
        let bridge = Bridge::new(&rt);
        let handle = bridge.to_foreign(&"gone".into()).unwrap().handle();
        let err = bridge.from_foreign(handle).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn descend_stops_at_limit() {
        let rt = MemoryRuntime::new();
        let config = BridgeConfig {
            max_depth: 2,
            ..BridgeConfig::default()
        };
        let bridge = Bridge::with_config(&rt, ExtensionRegistry::new(), config);
        assert_eq!(bridge.descend(1).unwrap(), 2);
        assert!(matches!(
            bridge.descend(2),
            Err(BridgeError::DepthLimit { limit: 2 })
        ));
    }
}
