//! Extension dispatch for host domain objects.
//!
//! Domain objects (physical quantities, wrappers around foreign objects, ...)
//! are not part of the bridge's value model. Instead each object reports
//! which capabilities it has, and converters registered for a capability
//! turn it into a foreign object.
//!
//! The registry is an ordinary value built by the caller and handed to
//! [`Bridge::with_extensions`](crate::Bridge::with_extensions). There is no
//! global registry.
//!
//! ```rust
//! use ocbridge::{ExtensionRegistry, HandleBackedConverter};
//!
//! let mut registry = ExtensionRegistry::new();
//! registry.register(HandleBackedConverter);
//! assert_eq!(registry.len(), 1);
//! ```

use std::any::Any;
use std::fmt;

use ocbridge_runtime::{Handle, Owned, Runtime};

use crate::error::{BridgeError, Result};
use crate::value::HostValue;

/// A numeric value paired with its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantityView<'a> {
    pub value: f64,
    pub unit: &'a str,
}

/// A host object the bridge can only convert through an extension.
///
/// Capabilities are probed through the `Option`-returning methods; an object
/// exhibits a capability when its probe returns `Some`.
pub trait DomainObject: fmt::Debug + Any {
    /// Name of the object's type, for error messages.
    fn type_name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;

    /// Value equality with another domain object.
    fn dyn_eq(&self, _other: &dyn DomainObject) -> bool {
        false
    }

    /// The object's numeric value and unit, if it has both.
    fn quantity(&self) -> Option<QuantityView<'_>> {
        None
    }

    /// The foreign object this host object wraps, borrowed.
    fn foreign_handle(&self) -> Option<Handle> {
        None
    }

    /// Text used when the object is a dictionary key.
    fn key_text(&self) -> Option<String> {
        None
    }
}

/// A structural trait of a domain object that a converter can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Has a numeric value and a unit.
    Quantity,
    /// Wraps a foreign object handle.
    ForeignHandle,
}

impl Capability {
    /// Every capability, in dispatch order.
    pub const ALL: [Capability; 2] = [Capability::Quantity, Capability::ForeignHandle];

    /// Whether `obj` exhibits this capability.
    pub fn present_in(self, obj: &dyn DomainObject) -> bool {
        match self {
            Capability::Quantity => obj.quantity().is_some(),
            Capability::ForeignHandle => obj.foreign_handle().is_some(),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Quantity => write!(f, "quantity"),
            Capability::ForeignHandle => write!(f, "foreign handle"),
        }
    }
}

/// Converts domain objects with one capability into foreign objects.
pub trait ExtensionConverter {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// The capability this converter serves.
    fn capability(&self) -> Capability;

    /// Narrow the objects this converter takes beyond the capability.
    fn accepts(&self, _obj: &dyn DomainObject) -> bool {
        true
    }

    /// Convert an object that exhibits [`capability`](Self::capability).
    fn to_foreign<'rt>(
        &self,
        runtime: &'rt dyn Runtime,
        obj: &dyn DomainObject,
    ) -> Result<Owned<'rt>>;

    /// Registered foreign type name whose objects this converter reads back.
    fn foreign_type_name(&self) -> Option<&str> {
        None
    }

    /// Convert a borrowed handle of [`foreign_type_name`](Self::foreign_type_name).
    fn from_foreign(&self, _runtime: &dyn Runtime, handle: Handle) -> Result<HostValue> {
        Ok(HostValue::Handle(handle.token()))
    }
}

/// Ordered collection of extension converters.
#[derive(Default)]
pub struct ExtensionRegistry {
    converters: Vec<Box<dyn ExtensionConverter>>,
}

impl ExtensionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a converter. Earlier registrations win.
    pub fn register(&mut self, converter: impl ExtensionConverter + 'static) -> &mut Self {
        self.converters.push(Box::new(converter));
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, converter: impl ExtensionConverter + 'static) -> Self {
        self.register(converter);
        self
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn ExtensionConverter> {
        self.converters.get(index).map(|c| c.as_ref())
    }

    /// Index of the first converter claiming a foreign type name.
    pub fn claimant(&self, type_name: &str) -> Option<usize> {
        self.converters
            .iter()
            .position(|c| c.foreign_type_name() == Some(type_name))
    }

    /// Find the converter for an object.
    ///
    /// Capabilities are tried in [`Capability::ALL`] order, converters in
    /// registration order.
    pub fn find(&self, obj: &dyn DomainObject) -> Option<&dyn ExtensionConverter> {
        Capability::ALL
            .into_iter()
            .filter(|cap| cap.present_in(obj))
            .find_map(|cap| {
                self.converters
                    .iter()
                    .find(|c| c.capability() == cap && c.accepts(obj))
            })
            .map(|c| c.as_ref())
    }

    /// Convert an object through the first matching converter.
    pub fn to_foreign<'rt>(
        &self,
        runtime: &'rt dyn Runtime,
        obj: &dyn DomainObject,
    ) -> Result<Owned<'rt>> {
        let converter = self.find(obj).ok_or_else(|| {
            BridgeError::type_error(format!(
                "no extension converter for {}",
                obj.type_name()
            ))
        })?;
        tracing::trace!(
            converter = converter.name(),
            object = obj.type_name(),
            "extension conversion"
        );
        converter.to_foreign(runtime, obj)
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.converters.iter().map(|c| c.name()))
            .finish()
    }
}

/// Converts objects that wrap a foreign handle by retaining that handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandleBackedConverter;

impl ExtensionConverter for HandleBackedConverter {
    fn name(&self) -> &str {
        "handle-backed"
    }

    fn capability(&self) -> Capability {
        Capability::ForeignHandle
    }

    fn to_foreign<'rt>(
        &self,
        runtime: &'rt dyn Runtime,
        obj: &dyn DomainObject,
    ) -> Result<Owned<'rt>> {
        let handle = obj.foreign_handle().ok_or_else(|| {
            BridgeError::type_error(format!("{} wraps no foreign object", obj.type_name()))
        })?;
        Ok(Owned::retain(runtime, handle)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Length(f64);

    impl DomainObject for Length {
        fn type_name(&self) -> &str {
            "Length"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn quantity(&self) -> Option<QuantityView<'_>> {
            Some(QuantityView {
                value: self.0,
                unit: "m",
            })
        }
    }

    #[derive(Debug)]
    struct Plain;

    impl DomainObject for Plain {
        fn type_name(&self) -> &str {
            "Plain"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Named(&'static str, Capability, bool);

    impl ExtensionConverter for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn capability(&self) -> Capability {
            self.1
        }

        fn accepts(&self, _obj: &dyn DomainObject) -> bool {
            self.2
        }

        fn to_foreign<'rt>(
            &self,
            _runtime: &'rt dyn Runtime,
            _obj: &dyn DomainObject,
        ) -> Result<Owned<'rt>> {
            Err(BridgeError::runtime_error("unused"))
        }
    }

    #[test]
    fn capabilities_are_probed() {
        assert!(Capability::Quantity.present_in(&Length(1.0)));
        assert!(!Capability::ForeignHandle.present_in(&Length(1.0)));
        assert!(!Capability::Quantity.present_in(&Plain));
    }

    #[test]
    fn find_respects_capability_and_order() {
        let registry = ExtensionRegistry::new()
            .with(HandleBackedConverter)
            .with(Named("picky", Capability::Quantity, false))
            .with(Named("first", Capability::Quantity, true))
            .with(Named("second", Capability::Quantity, true));

        let found = registry.find(&Length(2.0)).unwrap();
        assert_eq!(found.name(), "first");
        assert!(registry.find(&Plain).is_none());
    }

    #[test]
    fn empty_registry_has_no_claimants() {
        let registry = ExtensionRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.claimant("SIScalar"), None);
        assert_eq!(format!("{:?}", registry), "[]");
    }
}
