//! Heap objects and builtin type identifiers.

use std::collections::{BTreeMap, BTreeSet};

use ocbridge_runtime::{type_names, ForeignTypeId, Handle, Number};

pub(crate) mod ids {
    use ocbridge_runtime::ForeignTypeId;

    pub const STRING: ForeignTypeId = ForeignTypeId(1);
    pub const MUTABLE_STRING: ForeignTypeId = ForeignTypeId(2);
    pub const NUMBER: ForeignTypeId = ForeignTypeId(3);
    pub const BOOLEAN: ForeignTypeId = ForeignTypeId(4);
    pub const DATA: ForeignTypeId = ForeignTypeId(5);
    pub const MUTABLE_DATA: ForeignTypeId = ForeignTypeId(6);
    pub const ARRAY: ForeignTypeId = ForeignTypeId(7);
    pub const MUTABLE_ARRAY: ForeignTypeId = ForeignTypeId(8);
    pub const DICTIONARY: ForeignTypeId = ForeignTypeId(9);
    pub const MUTABLE_DICTIONARY: ForeignTypeId = ForeignTypeId(10);
    pub const SET: ForeignTypeId = ForeignTypeId(11);
    pub const MUTABLE_SET: ForeignTypeId = ForeignTypeId(12);
    pub const INDEX_ARRAY: ForeignTypeId = ForeignTypeId(13);
    pub const MUTABLE_INDEX_ARRAY: ForeignTypeId = ForeignTypeId(14);
    pub const INDEX_SET: ForeignTypeId = ForeignTypeId(15);
    pub const MUTABLE_INDEX_SET: ForeignTypeId = ForeignTypeId(16);
    pub const INDEX_PAIR_SET: ForeignTypeId = ForeignTypeId(17);
    pub const MUTABLE_INDEX_PAIR_SET: ForeignTypeId = ForeignTypeId(18);

    /// First identifier handed out to caller-registered types.
    pub const FIRST_CUSTOM: u32 = 1000;
}

/// Builtin identifiers paired with their registered names.
pub(crate) const BUILTIN_TYPES: &[(ForeignTypeId, &str)] = &[
    (ids::STRING, type_names::STRING),
    (ids::MUTABLE_STRING, type_names::MUTABLE_STRING),
    (ids::NUMBER, type_names::NUMBER),
    (ids::BOOLEAN, type_names::BOOLEAN),
    (ids::DATA, type_names::DATA),
    (ids::MUTABLE_DATA, type_names::MUTABLE_DATA),
    (ids::ARRAY, type_names::ARRAY),
    (ids::MUTABLE_ARRAY, type_names::MUTABLE_ARRAY),
    (ids::DICTIONARY, type_names::DICTIONARY),
    (ids::MUTABLE_DICTIONARY, type_names::MUTABLE_DICTIONARY),
    (ids::SET, type_names::SET),
    (ids::MUTABLE_SET, type_names::MUTABLE_SET),
    (ids::INDEX_ARRAY, type_names::INDEX_ARRAY),
    (ids::MUTABLE_INDEX_ARRAY, type_names::MUTABLE_INDEX_ARRAY),
    (ids::INDEX_SET, type_names::INDEX_SET),
    (ids::MUTABLE_INDEX_SET, type_names::MUTABLE_INDEX_SET),
    (ids::INDEX_PAIR_SET, type_names::INDEX_PAIR_SET),
    (ids::MUTABLE_INDEX_PAIR_SET, type_names::MUTABLE_INDEX_PAIR_SET),
];

pub(crate) fn is_mutable(type_id: ForeignTypeId) -> bool {
    matches!(
        type_id,
        ids::MUTABLE_STRING
            | ids::MUTABLE_DATA
            | ids::MUTABLE_ARRAY
            | ids::MUTABLE_DICTIONARY
            | ids::MUTABLE_SET
            | ids::MUTABLE_INDEX_ARRAY
            | ids::MUTABLE_INDEX_SET
            | ids::MUTABLE_INDEX_PAIR_SET
    )
}

/// Stored representation of a number object.
#[derive(Debug, Clone, Copy)]
pub(crate) enum NumberRepr {
    Known(Number),
    /// A layout tag the runtime does not know how to decode.
    Unknown(u8),
}

#[derive(Debug)]
pub(crate) enum Payload {
    String(String),
    Number(NumberRepr),
    Boolean(bool),
    Data(Vec<u8>),
    Array(Vec<Handle>),
    Dictionary(Vec<(Handle, Handle)>),
    Set(Vec<Handle>),
    IndexArray(Vec<i64>),
    IndexSet(BTreeSet<i64>),
    IndexPairSet(BTreeMap<i64, i64>),
    Opaque(Vec<u8>),
}

impl Payload {
    /// Handles this payload holds a reference to.
    pub(crate) fn children(&self) -> Vec<Handle> {
        match self {
            Payload::Array(items) | Payload::Set(items) => items.clone(),
            Payload::Dictionary(entries) => entries
                .iter()
                .flat_map(|(key, value)| [*key, *value])
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Object {
    pub(crate) type_id: ForeignTypeId,
    pub(crate) retain_count: usize,
    /// Singletons are never freed and ignore retain/release.
    pub(crate) singleton: bool,
    pub(crate) payload: Payload,
}

impl Object {
    pub(crate) fn new(type_id: ForeignTypeId, payload: Payload) -> Self {
        Self {
            type_id,
            retain_count: 1,
            singleton: false,
            payload,
        }
    }

    pub(crate) fn singleton(type_id: ForeignTypeId, payload: Payload) -> Self {
        Self {
            type_id,
            retain_count: 1,
            singleton: true,
            payload,
        }
    }
}

/// Value equality used for set membership and dictionary keys.
///
/// Strings, numbers, booleans and byte buffers compare by content; every
/// other kind compares by identity.
pub(crate) fn payloads_equal(a: &Payload, b: &Payload) -> bool {
    match (a, b) {
        (Payload::String(x), Payload::String(y)) => x == y,
        (Payload::Boolean(x), Payload::Boolean(y)) => x == y,
        (Payload::Data(x), Payload::Data(y)) => x == y,
        (Payload::Number(NumberRepr::Known(x)), Payload::Number(NumberRepr::Known(y))) => {
            numbers_equal(x, y)
        }
        _ => false,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    match (integer_value(a), integer_value(b)) {
        (Some(x), Some(y)) => return x == y,
        (Some(_), None) | (None, Some(_)) => return false,
        (None, None) => {}
    }
    match (a, b) {
        (Number::Float32(x), Number::Float32(y)) => x == y,
        (Number::Float64(x), Number::Float64(y)) => x == y,
        (Number::Float32(x), Number::Float64(y)) | (Number::Float64(y), Number::Float32(x)) => {
            f64::from(*x) == *y
        }
        (Number::Complex64(x), Number::Complex64(y)) => x == y,
        (Number::Complex128(x), Number::Complex128(y)) => x == y,
        _ => false,
    }
}

fn integer_value(n: &Number) -> Option<i128> {
    match *n {
        Number::SInt8(v) => Some(v.into()),
        Number::SInt16(v) => Some(v.into()),
        Number::SInt32(v) => Some(v.into()),
        Number::SInt64(v) => Some(v.into()),
        Number::UInt8(v) => Some(v.into()),
        Number::UInt16(v) => Some(v.into()),
        Number::UInt32(v) => Some(v.into()),
        Number::UInt64(v) => Some(v.into()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_matches_names() {
        let names: Vec<&str> = BUILTIN_TYPES.iter().map(|(_, name)| *name).collect();
        assert_eq!(names, type_names::ALL);
    }

    #[test]
    fn integers_compare_across_widths() {
        let a = Payload::Number(NumberRepr::Known(Number::SInt32(7)));
        let b = Payload::Number(NumberRepr::Known(Number::SInt64(7)));
        assert!(payloads_equal(&a, &b));

        let c = Payload::Number(NumberRepr::Known(Number::Float64(7.0)));
        assert!(!payloads_equal(&a, &c));
    }

    #[test]
    fn containers_compare_by_identity_only() {
        let a = Payload::Array(Vec::new());
        let b = Payload::Array(Vec::new());
        assert!(!payloads_equal(&a, &b));
    }

    #[test]
    fn dictionary_children_include_keys() {
        let mut slots = [0u8; 2];
        let k = Handle::from_raw(&mut slots[0] as *mut u8 as *mut _).unwrap();
        let v = Handle::from_raw(&mut slots[1] as *mut u8 as *mut _).unwrap();
        let payload = Payload::Dictionary(vec![(k, v)]);
        assert_eq!(payload.children(), vec![k, v]);
    }
}
