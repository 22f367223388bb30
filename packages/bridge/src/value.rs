//! The host value model.
//!
//! `HostValue` is the garbage-collected side of the bridge: a dynamically
//! typed tree that owns its data outright. Dropping it never touches the
//! foreign runtime.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use bytes::Bytes;
use num_complex::Complex64;

use crate::extension::DomainObject;

/// A value on the host side of the bridge.
///
/// # Design Notes
///
/// - `Dict` keeps insertion order and allows any hashable key. Only the
///   conversion to a foreign dictionary coerces keys to text.
/// - `Dict` and `Set` compare without regard to order.
/// - `Handle` is an opaque token for a foreign object the bridge could not
///   interpret. It is informational and cannot be converted back.
#[derive(Clone, Debug, Default)]
pub enum HostValue {
    /// Absence of a value.
    #[default]
    None,
    Bool(bool),
    /// Signed 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Complex number with 64-bit components.
    Complex(Complex64),
    /// UTF-8 text.
    Text(String),
    /// Raw byte buffer.
    Bytes(Bytes),
    /// Ordered sequence.
    List(Vec<HostValue>),
    /// Key-value pairs in insertion order.
    Dict(Vec<(HostValue, HostValue)>),
    /// Unordered collection of distinct hashable values.
    Set(Vec<HostValue>),
    /// A domain object recognized by extension dispatch.
    Object(Rc<dyn DomainObject>),
    /// Pointer-sized token of an unrecognized foreign object.
    Handle(usize),
}

impl HostValue {
    /// Build a list.
    pub fn list(items: impl IntoIterator<Item = HostValue>) -> Self {
        HostValue::List(items.into_iter().collect())
    }

    /// Build a dictionary. A repeated key replaces the earlier entry in place.
    pub fn dict(entries: impl IntoIterator<Item = (HostValue, HostValue)>) -> Self {
        let mut out: Vec<(HostValue, HostValue)> = Vec::new();
        for (key, value) in entries {
            match out.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => out.push((key, value)),
            }
        }
        HostValue::Dict(out)
    }

    /// Build a set, dropping duplicates.
    pub fn set(items: impl IntoIterator<Item = HostValue>) -> Self {
        let mut out: Vec<HostValue> = Vec::new();
        for item in items {
            if !out.contains(&item) {
                out.push(item);
            }
        }
        HostValue::Set(out)
    }

    /// Wrap a domain object.
    pub fn object(obj: impl DomainObject) -> Self {
        HostValue::Object(Rc::new(obj))
    }

    /// Check if this value is `None`.
    pub fn is_none(&self) -> bool {
        matches!(self, HostValue::None)
    }

    /// Check if this value is a list, dictionary or set.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            HostValue::List(_) | HostValue::Dict(_) | HostValue::Set(_)
        )
    }

    /// Name of the host type, for error messages.
    pub fn type_name(&self) -> &str {
        match self {
            HostValue::None => "none",
            HostValue::Bool(_) => "bool",
            HostValue::Int(_) => "int",
            HostValue::Float(_) => "float",
            HostValue::Complex(_) => "complex",
            HostValue::Text(_) => "text",
            HostValue::Bytes(_) => "bytes",
            HostValue::List(_) => "list",
            HostValue::Dict(_) => "dict",
            HostValue::Set(_) => "set",
            HostValue::Object(obj) => obj.type_name(),
            HostValue::Handle(_) => "handle token",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            HostValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            HostValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a dictionary entry by key.
    pub fn get(&self, key: &HostValue) -> Option<&HostValue> {
        match self {
            HostValue::Dict(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Check set membership.
    pub fn contains(&self, item: &HostValue) -> bool {
        match self {
            HostValue::Set(items) | HostValue::List(items) => items.contains(item),
            _ => false,
        }
    }
}

impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HostValue::None, HostValue::None) => true,
            (HostValue::Bool(a), HostValue::Bool(b)) => a == b,
            (HostValue::Int(a), HostValue::Int(b)) => a == b,
            (HostValue::Float(a), HostValue::Float(b)) => a == b,
            (HostValue::Complex(a), HostValue::Complex(b)) => a == b,
            (HostValue::Text(a), HostValue::Text(b)) => a == b,
            (HostValue::Bytes(a), HostValue::Bytes(b)) => a == b,
            (HostValue::List(a), HostValue::List(b)) => a == b,
            (HostValue::Dict(a), HostValue::Dict(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.iter().any(|(bk, bv)| k == bk && v == bv))
            }
            (HostValue::Set(a), HostValue::Set(b)) => {
                a.len() == b.len() && a.iter().all(|x| b.contains(x))
            }
            (HostValue::Object(a), HostValue::Object(b)) => {
                Rc::ptr_eq(a, b) || a.dyn_eq(b.as_ref())
            }
            (HostValue::Handle(a), HostValue::Handle(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::None => write!(f, "None"),
            HostValue::Bool(b) => write!(f, "{}", b),
            HostValue::Int(i) => write!(f, "{}", i),
            HostValue::Float(x) => write!(f, "{:?}", x),
            HostValue::Complex(c) => write!(f, "{}", c),
            HostValue::Text(s) => write!(f, "{:?}", s),
            HostValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            HostValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            HostValue::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            HostValue::Set(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "}}")
            }
            HostValue::Object(obj) => write!(f, "<{}>", obj.type_name()),
            HostValue::Handle(token) => write!(f, "<handle {:#x}>", token),
        }
    }
}

impl From<bool> for HostValue {
    fn from(v: bool) -> Self {
        HostValue::Bool(v)
    }
}

impl From<i64> for HostValue {
    fn from(v: i64) -> Self {
        HostValue::Int(v)
    }
}

impl From<i32> for HostValue {
    fn from(v: i32) -> Self {
        HostValue::Int(v as i64)
    }
}

impl From<f64> for HostValue {
    fn from(v: f64) -> Self {
        HostValue::Float(v)
    }
}

impl From<Complex64> for HostValue {
    fn from(v: Complex64) -> Self {
        HostValue::Complex(v)
    }
}

impl From<String> for HostValue {
    fn from(v: String) -> Self {
        HostValue::Text(v)
    }
}

impl From<&str> for HostValue {
    fn from(v: &str) -> Self {
        HostValue::Text(v.to_string())
    }
}

impl From<Bytes> for HostValue {
    fn from(v: Bytes) -> Self {
        HostValue::Bytes(v)
    }
}

impl<T: Into<HostValue>> From<Vec<T>> for HostValue {
    fn from(v: Vec<T>) -> Self {
        HostValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, HostValue>> for HostValue {
    fn from(map: BTreeMap<String, HostValue>) -> Self {
        HostValue::Dict(
            map.into_iter()
                .map(|(k, v)| (HostValue::Text(k), v))
                .collect(),
        )
    }
}

impl From<Rc<dyn DomainObject>> for HostValue {
    fn from(v: Rc<dyn DomainObject>) -> Self {
        HostValue::Object(v)
    }
}
