use std::any::Any;
use std::rc::Rc;

use ocbridge::{
    Bridge, BridgeError, Capability, DomainObject, ErrorKind, ExtensionConverter,
    ExtensionRegistry, ForeignTypeId, Handle, HandleBackedConverter, HostValue, Owned,
    QuantityView, Result, Runtime, TypeKind,
};
use ocbridge_memory_runtime::MemoryRuntime;

const SCALAR_TYPE: &str = "SIScalar";

/// A physical quantity living on the host side.
#[derive(Debug, PartialEq)]
struct Quantity {
    value: f64,
    unit: String,
}

impl DomainObject for Quantity {
    fn type_name(&self) -> &str {
        "Quantity"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn DomainObject) -> bool {
        other.as_any().downcast_ref::<Quantity>() == Some(self)
    }

    fn quantity(&self) -> Option<QuantityView<'_>> {
        Some(QuantityView {
            value: self.value,
            unit: &self.unit,
        })
    }

    fn key_text(&self) -> Option<String> {
        Some(format!("{} {}", self.value, self.unit))
    }
}

/// A host wrapper around an existing foreign object.
#[derive(Debug)]
struct Wrapped(Handle);

impl DomainObject for Wrapped {
    fn type_name(&self) -> &str {
        "Wrapped"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn foreign_handle(&self) -> Option<Handle> {
        Some(self.0)
    }
}

#[derive(Debug)]
struct Opaque;

impl DomainObject for Opaque {
    fn type_name(&self) -> &str {
        "Opaque"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Stores quantities as scalar objects whose payload is "<value> <unit>".
struct ScalarConverter {
    runtime: Rc<MemoryRuntime>,
    type_id: ForeignTypeId,
}

impl ExtensionConverter for ScalarConverter {
    fn name(&self) -> &str {
        "si-scalar"
    }

    fn capability(&self) -> Capability {
        Capability::Quantity
    }

    fn to_foreign<'rt>(
        &self,
        runtime: &'rt dyn Runtime,
        obj: &dyn DomainObject,
    ) -> Result<Owned<'rt>> {
        let q = obj
            .quantity()
            .ok_or_else(|| BridgeError::Type {
                message: "not a quantity".to_string(),
            })?;
        let payload = format!("{} {}", q.value, q.unit);
        let handle = self.runtime.create_opaque(self.type_id, payload.as_bytes())?;
        Ok(Owned::adopt(runtime, handle))
    }

    fn foreign_type_name(&self) -> Option<&str> {
        Some(SCALAR_TYPE)
    }

    fn from_foreign(&self, _runtime: &dyn Runtime, handle: Handle) -> Result<HostValue> {
        let payload = self.runtime.opaque_payload(handle)?;
        let text = String::from_utf8_lossy(&payload);
        let (value, unit) = text.split_once(' ').ok_or_else(|| BridgeError::Value {
            message: format!("malformed scalar payload {:?}", text),
        })?;
        let value = value.parse::<f64>().map_err(|e| BridgeError::Value {
            message: e.to_string(),
        })?;
        Ok(HostValue::object(Quantity {
            value,
            unit: unit.to_string(),
        }))
    }
}

fn scalar_runtime() -> (Rc<MemoryRuntime>, ForeignTypeId) {
    let mut rt = MemoryRuntime::new();
    let type_id = rt.register_type(SCALAR_TYPE);
    (Rc::new(rt), type_id)
}

fn meters(value: f64) -> HostValue {
    HostValue::object(Quantity {
        value,
        unit: "m".to_string(),
    })
}

#[test]
fn test_quantity_round_trips_through_converter() {
    let (rt, type_id) = scalar_runtime();
    let registry = ExtensionRegistry::new().with(ScalarConverter {
        runtime: Rc::clone(&rt),
        type_id,
    });
    let bridge = Bridge::with_extensions(&*rt, registry);

    assert_eq!(bridge.types().kind_of(type_id), TypeKind::Extension(0));

    let value = meters(4.5);
    let foreign = bridge.to_foreign(&value).unwrap();
    assert_eq!(rt.type_id_of(foreign.handle()).unwrap(), type_id);
    assert_eq!(bridge.from_foreign(foreign.handle()).unwrap(), value);

    drop(foreign);
    assert_eq!(rt.live_objects(), 2);
}

#[test]
fn test_quantities_inside_containers() {
    let (rt, type_id) = scalar_runtime();
    let registry = ExtensionRegistry::new().with(ScalarConverter {
        runtime: Rc::clone(&rt),
        type_id,
    });
    let bridge = Bridge::with_extensions(&*rt, registry);

    let value = HostValue::list([meters(1.0), HostValue::set([meters(2.0)])]);
    let foreign = bridge.to_foreign(&value).unwrap();
    assert_eq!(bridge.from_foreign(foreign.handle()).unwrap(), value);

    // Domain objects with a key text can be dictionary keys.
    let dict = HostValue::dict([(meters(3.0), 1.into())]);
    let foreign = bridge.to_foreign(&dict).unwrap();
    assert_eq!(
        bridge.from_foreign(foreign.handle()).unwrap(),
        HostValue::dict([("3 m".into(), 1.into())])
    );
}

#[test]
fn test_without_converter_is_type_error() {
    let rt = MemoryRuntime::new();
    let bridge = Bridge::new(&rt);

    let err = bridge.to_foreign(&meters(1.0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert!(err.to_string().contains("Quantity"));

    let err = bridge.to_foreign(&HostValue::object(Opaque)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);

    let err = bridge
        .dict_to_foreign(&[(HostValue::object(Opaque), 1.into())])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert_eq!(rt.allocations(), 0);
}

#[test]
fn test_unclaimed_extension_type_is_a_token() {
    let (rt, type_id) = scalar_runtime();
    let bridge = Bridge::new(&*rt);

    let handle = rt.create_opaque(type_id, b"1 m").unwrap();
    let owned = Owned::adopt(&*rt, handle);
    assert_eq!(
        bridge.from_foreign(owned.handle()).unwrap(),
        HostValue::Handle(handle.token())
    );
}

#[test]
fn test_handle_backed_objects_are_retained() {
    let rt = MemoryRuntime::new();
    let registry = ExtensionRegistry::new().with(HandleBackedConverter);
    let bridge = Bridge::with_extensions(&rt, registry);

    let inner = bridge.to_foreign(&"wrapped text".into()).unwrap();
    let value = HostValue::object(Wrapped(inner.handle()));

    let foreign = bridge.to_foreign(&value).unwrap();
    assert_eq!(foreign.handle(), inner.handle());
    assert_eq!(rt.retain_count(inner.handle()), Some(2));
    assert_eq!(
        bridge.from_foreign(foreign.handle()).unwrap(),
        HostValue::from("wrapped text")
    );

    // A list holding the wrapper holds the wrapped object itself.
    let list = bridge.to_foreign(&HostValue::list([value])).unwrap();
    assert_eq!(
        bridge.from_foreign(list.handle()).unwrap(),
        HostValue::list(["wrapped text".into()])
    );

    drop((list, foreign, inner));
    assert_eq!(rt.live_objects(), 2);
    assert_eq!(rt.invalid_releases(), 0);
}

#[test]
fn test_capability_order_prefers_quantity() {
    #[derive(Debug)]
    struct Both(Handle);

    impl DomainObject for Both {
        fn type_name(&self) -> &str {
            "Both"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn quantity(&self) -> Option<QuantityView<'_>> {
            Some(QuantityView {
                value: 9.0,
                unit: "s",
            })
        }

        fn foreign_handle(&self) -> Option<Handle> {
            Some(self.0)
        }
    }

    let (rt, type_id) = scalar_runtime();
    let registry = ExtensionRegistry::new()
        .with(HandleBackedConverter)
        .with(ScalarConverter {
            runtime: Rc::clone(&rt),
            type_id,
        });
    let bridge = Bridge::with_extensions(&*rt, registry);

    let wrapped = bridge.to_foreign(&1.into()).unwrap();
    let foreign = bridge
        .to_foreign(&HostValue::object(Both(wrapped.handle())))
        .unwrap();
    assert_eq!(bridge.identify(foreign.handle()).unwrap(), TypeKind::Extension(1));
}
