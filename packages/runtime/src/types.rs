//! Type identifiers and primitive payloads at the boundary.

use std::fmt;

use num_complex::{Complex32, Complex64};

/// A runtime-assigned type identifier.
///
/// The numeric value is meaningful only to the runtime that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForeignTypeId(pub u32);

impl fmt::Display for ForeignTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A type the runtime knows about: its identifier and registered name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub id: ForeignTypeId,
    pub name: String,
}

impl TypeDescriptor {
    pub fn new(id: ForeignTypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Registered names of the builtin object kinds.
pub mod type_names {
    pub const STRING: &str = "OCString";
    pub const MUTABLE_STRING: &str = "OCMutableString";
    pub const NUMBER: &str = "OCNumber";
    pub const BOOLEAN: &str = "OCBoolean";
    pub const DATA: &str = "OCData";
    pub const MUTABLE_DATA: &str = "OCMutableData";
    pub const ARRAY: &str = "OCArray";
    pub const MUTABLE_ARRAY: &str = "OCMutableArray";
    pub const DICTIONARY: &str = "OCDictionary";
    pub const MUTABLE_DICTIONARY: &str = "OCMutableDictionary";
    pub const SET: &str = "OCSet";
    pub const MUTABLE_SET: &str = "OCMutableSet";
    pub const INDEX_ARRAY: &str = "OCIndexArray";
    pub const MUTABLE_INDEX_ARRAY: &str = "OCMutableIndexArray";
    pub const INDEX_SET: &str = "OCIndexSet";
    pub const MUTABLE_INDEX_SET: &str = "OCMutableIndexSet";
    pub const INDEX_PAIR_SET: &str = "OCIndexPairSet";
    pub const MUTABLE_INDEX_PAIR_SET: &str = "OCMutableIndexPairSet";

    /// Every builtin name, in registration order.
    pub const ALL: &[&str] = &[
        STRING,
        MUTABLE_STRING,
        NUMBER,
        BOOLEAN,
        DATA,
        MUTABLE_DATA,
        ARRAY,
        MUTABLE_ARRAY,
        DICTIONARY,
        MUTABLE_DICTIONARY,
        SET,
        MUTABLE_SET,
        INDEX_ARRAY,
        MUTABLE_INDEX_ARRAY,
        INDEX_SET,
        MUTABLE_INDEX_SET,
        INDEX_PAIR_SET,
        MUTABLE_INDEX_PAIR_SET,
    ];
}

/// The value held by a foreign number object, tagged by its storage layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    SInt8(i8),
    SInt16(i16),
    SInt32(i32),
    SInt64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Complex64(Complex32),
    Complex128(Complex64),
}

impl Number {
    /// Name of the storage layout, as the runtime reports it.
    pub fn layout_name(&self) -> &'static str {
        match self {
            Number::SInt8(_) => "sint8",
            Number::SInt16(_) => "sint16",
            Number::SInt32(_) => "sint32",
            Number::SInt64(_) => "sint64",
            Number::UInt8(_) => "uint8",
            Number::UInt16(_) => "uint16",
            Number::UInt32(_) => "uint32",
            Number::UInt64(_) => "uint64",
            Number::Float32(_) => "float32",
            Number::Float64(_) => "float64",
            Number::Complex64(_) => "complex64",
            Number::Complex128(_) => "complex128",
        }
    }

    /// Whether the layout is an integer layout.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Number::SInt8(_)
                | Number::SInt16(_)
                | Number::SInt32(_)
                | Number::SInt64(_)
                | Number::UInt8(_)
                | Number::UInt16(_)
                | Number::UInt32(_)
                | Number::UInt64(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_are_unique() {
        let mut names: Vec<&str> = type_names::ALL.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), type_names::ALL.len());
    }

    #[test]
    fn layout_names() {
        assert_eq!(Number::SInt32(1).layout_name(), "sint32");
        assert_eq!(
            Number::Complex128(Complex64::new(1.0, 2.0)).layout_name(),
            "complex128"
        );
        assert!(Number::UInt64(7).is_integer());
        assert!(!Number::Float32(1.5).is_integer());
    }

    #[test]
    fn type_id_display() {
        assert_eq!(format!("{}", ForeignTypeId(7)), "#7");
    }
}
