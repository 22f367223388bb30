//! Conversions for primitive values: text, numbers, booleans and bytes.
//!
//! Every `*_to_foreign` function returns an owned reference. Every
//! `foreign_to_*` function takes a borrowed handle and leaves its count alone.

use bytes::Bytes;
use num_complex::{Complex, Complex64};
use ocbridge_runtime::{Handle, Number, Owned, Runtime};

use crate::error::{BridgeError, Result};
use crate::value::HostValue;

// === Text ===

pub fn text_to_foreign<'rt>(runtime: &'rt dyn Runtime, text: &str) -> Result<Owned<'rt>> {
    tracing::trace!(len = text.len(), "text to foreign");
    Ok(Owned::adopt(runtime, runtime.string_create(text, false)?))
}

/// Create a mutable string.
pub fn text_to_foreign_mutable<'rt>(runtime: &'rt dyn Runtime, text: &str) -> Result<Owned<'rt>> {
    Ok(Owned::adopt(runtime, runtime.string_create(text, true)?))
}

/// Absent text maps to no handle rather than an error.
pub fn optional_text_to_foreign<'rt>(
    runtime: &'rt dyn Runtime,
    text: Option<&str>,
) -> Result<Option<Owned<'rt>>> {
    text.map(|t| text_to_foreign(runtime, t)).transpose()
}

pub fn foreign_to_text(runtime: &dyn Runtime, handle: Handle) -> Result<String> {
    let mut decoded = None;
    runtime.string_bytes(handle, &mut |bytes: &[u8]| {
        decoded = Some(String::from_utf8(bytes.to_vec()));
    })?;
    match decoded {
        Some(Ok(text)) => Ok(text),
        Some(Err(e)) => Err(BridgeError::runtime_error(format!(
            "foreign string is not valid UTF-8: {}",
            e
        ))),
        None => Err(BridgeError::runtime_error("runtime yielded no string bytes")),
    }
}

// === Numbers ===

/// Integers that fit in 32 bits become 32-bit numbers, the rest 64-bit.
pub fn int_to_foreign<'rt>(runtime: &'rt dyn Runtime, value: i64) -> Result<Owned<'rt>> {
    let number = match i32::try_from(value) {
        Ok(narrow) => Number::SInt32(narrow),
        Err(_) => Number::SInt64(value),
    };
    tracing::trace!(value, layout = number.layout_name(), "int to foreign");
    Ok(Owned::adopt(runtime, runtime.number_create(number)?))
}

pub fn float_to_foreign<'rt>(runtime: &'rt dyn Runtime, value: f64) -> Result<Owned<'rt>> {
    tracing::trace!(value, "float to foreign");
    Ok(Owned::adopt(runtime, runtime.number_create(Number::Float64(value))?))
}

pub fn complex_to_foreign<'rt>(runtime: &'rt dyn Runtime, value: Complex64) -> Result<Owned<'rt>> {
    tracing::trace!(re = value.re, im = value.im, "complex to foreign");
    Ok(Owned::adopt(
        runtime,
        runtime.number_create(Number::Complex128(value))?,
    ))
}

/// Convert an `Int`, `Float` or `Complex` host value.
pub fn number_to_foreign<'rt>(runtime: &'rt dyn Runtime, value: &HostValue) -> Result<Owned<'rt>> {
    match value {
        HostValue::Int(i) => int_to_foreign(runtime, *i),
        HostValue::Float(x) => float_to_foreign(runtime, *x),
        HostValue::Complex(c) => complex_to_foreign(runtime, *c),
        other => Err(BridgeError::type_error(format!(
            "expected a number, got {}",
            other.type_name()
        ))),
    }
}

/// Read a number back as `Int`, `Float` or `Complex`.
pub fn foreign_to_number(runtime: &dyn Runtime, handle: Handle) -> Result<HostValue> {
    let number = runtime.number_value(handle)?;
    let value = match number {
        Number::SInt8(v) => HostValue::Int(v.into()),
        Number::SInt16(v) => HostValue::Int(v.into()),
        Number::SInt32(v) => HostValue::Int(v.into()),
        Number::SInt64(v) => HostValue::Int(v),
        Number::UInt8(v) => HostValue::Int(v.into()),
        Number::UInt16(v) => HostValue::Int(v.into()),
        Number::UInt32(v) => HostValue::Int(v.into()),
        Number::UInt64(v) => HostValue::Int(i64::try_from(v).map_err(|_| {
            BridgeError::runtime_error(format!(
                "unsigned value {} exceeds the host integer range",
                v
            ))
        })?),
        Number::Float32(v) => HostValue::Float(v.into()),
        Number::Float64(v) => HostValue::Float(v),
        Number::Complex64(c) => HostValue::Complex(Complex64::new(c.re.into(), c.im.into())),
        Number::Complex128(c) => HostValue::Complex(c),
    };
    Ok(value)
}

// === Booleans ===

/// Booleans are runtime singletons; the returned guard's release is a no-op.
pub fn bool_to_foreign(runtime: &dyn Runtime, value: bool) -> Owned<'_> {
    Owned::adopt(runtime, runtime.boolean(value))
}

pub fn foreign_to_bool(runtime: &dyn Runtime, handle: Handle) -> Result<bool> {
    Ok(runtime.boolean_value(handle)?)
}

// === Bytes ===

pub fn bytes_to_foreign<'rt>(runtime: &'rt dyn Runtime, bytes: &[u8]) -> Result<Owned<'rt>> {
    tracing::trace!(len = bytes.len(), "bytes to foreign");
    Ok(Owned::adopt(runtime, runtime.data_create(bytes, false)?))
}

pub fn bytes_to_foreign_mutable<'rt>(
    runtime: &'rt dyn Runtime,
    bytes: &[u8],
) -> Result<Owned<'rt>> {
    Ok(Owned::adopt(runtime, runtime.data_create(bytes, true)?))
}

/// Fixed-width numeric element that packs into a data buffer.
pub trait PackedElement: Copy {
    /// Packed size in bytes.
    const WIDTH: usize;

    fn pack_into(self, out: &mut Vec<u8>);

    /// `bytes` is exactly `WIDTH` long.
    fn unpack(bytes: &[u8]) -> Self;
}

macro_rules! packed_element {
    ($($ty:ty),*) => {
        $(
            impl PackedElement for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn pack_into(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_ne_bytes());
                }

                fn unpack(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_ne_bytes(raw)
                }
            }
        )*
    };
}

packed_element!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

// Complex elements are the real part followed by the imaginary part.
macro_rules! packed_complex {
    ($($ty:ty),*) => {
        $(
            impl PackedElement for Complex<$ty> {
                const WIDTH: usize = 2 * <$ty as PackedElement>::WIDTH;

                fn pack_into(self, out: &mut Vec<u8>) {
                    self.re.pack_into(out);
                    self.im.pack_into(out);
                }

                fn unpack(bytes: &[u8]) -> Self {
                    let (re, im) = bytes.split_at(<$ty as PackedElement>::WIDTH);
                    Complex::new(<$ty>::unpack(re), <$ty>::unpack(im))
                }
            }
        )*
    };
}

packed_complex!(f32, f64);

fn pack<T: PackedElement>(values: &[T]) -> Vec<u8> {
    let mut packed = Vec::with_capacity(values.len() * T::WIDTH);
    for value in values {
        value.pack_into(&mut packed);
    }
    packed
}

/// Pack a contiguous numeric slice into an immutable data buffer in native
/// byte order.
pub fn numbers_to_foreign_data<'rt, T: PackedElement>(
    runtime: &'rt dyn Runtime,
    values: &[T],
) -> Result<Owned<'rt>> {
    bytes_to_foreign(runtime, &pack(values))
}

pub fn numbers_to_foreign_mutable_data<'rt, T: PackedElement>(
    runtime: &'rt dyn Runtime,
    values: &[T],
) -> Result<Owned<'rt>> {
    bytes_to_foreign_mutable(runtime, &pack(values))
}

/// Read a data buffer back as native-endian elements of `T`.
///
/// A buffer whose length is not a whole number of elements is a runtime
/// error.
pub fn foreign_data_to_numbers<T: PackedElement>(
    runtime: &dyn Runtime,
    handle: Handle,
) -> Result<Vec<T>> {
    let mut unpacked: Option<std::result::Result<Vec<T>, usize>> = None;
    runtime.data_bytes(handle, &mut |bytes: &[u8]| {
        unpacked = Some(if bytes.len() % T::WIDTH == 0 {
            Ok(bytes.chunks_exact(T::WIDTH).map(T::unpack).collect())
        } else {
            Err(bytes.len())
        });
    })?;
    match unpacked {
        Some(Ok(values)) => Ok(values),
        Some(Err(len)) => Err(BridgeError::runtime_error(format!(
            "data buffer of {} bytes is not a whole number of {}-byte elements",
            len,
            T::WIDTH
        ))),
        None => Err(BridgeError::runtime_error("runtime yielded no data bytes")),
    }
}

/// Copy a data buffer into host-owned bytes.
pub fn foreign_to_bytes(runtime: &dyn Runtime, handle: Handle) -> Result<Bytes> {
    let mut copied = Bytes::new();
    runtime.data_bytes(handle, &mut |bytes: &[u8]| copied = Bytes::copy_from_slice(bytes))?;
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use ocbridge_memory_runtime::MemoryRuntime;

    #[test]
    fn int_width_selection() {
        let rt = MemoryRuntime::new();
        for (value, expected) in [
            (0, Number::SInt32(0)),
            (i32::MAX as i64, Number::SInt32(i32::MAX)),
            (i32::MAX as i64 + 1, Number::SInt64(2_147_483_648)),
            (i32::MIN as i64 - 1, Number::SInt64(-2_147_483_649)),
        ] {
            let owned = int_to_foreign(&rt, value).unwrap();
            assert_eq!(rt.number_value(owned.handle()).unwrap(), expected);
            assert_eq!(
                foreign_to_number(&rt, owned.handle()).unwrap(),
                HostValue::Int(value)
            );
        }
        assert_eq!(rt.live_objects(), 2);
    }

    #[test]
    fn unsigned_overflow_is_a_runtime_error() {
        let rt = MemoryRuntime::new();
        let big = Owned::adopt(&rt, rt.number_create(Number::UInt64(u64::MAX)).unwrap());
        let err = foreign_to_number(&rt, big.handle()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Runtime);

        let small = Owned::adopt(&rt, rt.number_create(Number::UInt64(7)).unwrap());
        assert_eq!(
            foreign_to_number(&rt, small.handle()).unwrap(),
            HostValue::Int(7)
        );
    }

    #[test]
    fn unknown_layout_names_the_type() {
        let rt = MemoryRuntime::new();
        let odd = Owned::adopt(&rt, rt.number_with_unknown_layout(99).unwrap());
        let err = foreign_to_number(&rt, odd.handle()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Runtime);
        assert!(err.to_string().contains("OCNumber"));
    }

    #[test]
    fn narrow_layouts_widen() {
        let rt = MemoryRuntime::new();
        let f = Owned::adopt(&rt, rt.number_create(Number::Float32(0.5)).unwrap());
        assert_eq!(foreign_to_number(&rt, f.handle()).unwrap(), HostValue::Float(0.5));

        let c = Owned::adopt(
            &rt,
            rt.number_create(Number::Complex64(num_complex::Complex32::new(1.0, -2.0)))
                .unwrap(),
        );
        assert_eq!(
            foreign_to_number(&rt, c.handle()).unwrap(),
            HostValue::Complex(Complex64::new(1.0, -2.0))
        );
    }

    #[test]
    fn number_rejects_non_numbers() {
        let rt = MemoryRuntime::new();
        let err = number_to_foreign(&rt, &HostValue::Bool(true)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert_eq!(rt.allocations(), 0);
    }

    #[test]
    fn text_round_trip() {
        let rt = MemoryRuntime::new();
        for text in ["", "plain", "héllo wörld ✓ 🦀"] {
            let owned = text_to_foreign(&rt, text).unwrap();
            assert_eq!(foreign_to_text(&rt, owned.handle()).unwrap(), text);
        }
        let mutable = text_to_foreign_mutable(&rt, "edit me").unwrap();
        assert_eq!(foreign_to_text(&rt, mutable.handle()).unwrap(), "edit me");
    }

    #[test]
    fn absent_optional_text_allocates_nothing() {
        let rt = MemoryRuntime::new();
        assert!(optional_text_to_foreign(&rt, None).unwrap().is_none());
        assert_eq!(rt.allocations(), 0);
        let some = optional_text_to_foreign(&rt, Some("x")).unwrap().unwrap();
        assert_eq!(foreign_to_text(&rt, some.handle()).unwrap(), "x");
    }

    #[test]
    fn reading_the_wrong_kind_is_a_type_error() {
        let rt = MemoryRuntime::new();
        let n = int_to_foreign(&rt, 1).unwrap();
        let err = foreign_to_text(&rt, n.handle()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn booleans_are_singletons() {
        let rt = MemoryRuntime::new();
        let t = bool_to_foreign(&rt, true);
        let again = bool_to_foreign(&rt, true);
        assert_eq!(t.handle(), again.handle());
        assert!(foreign_to_bool(&rt, t.handle()).unwrap());
        drop((t, again));
        assert_eq!(rt.live_objects(), 2);
        assert_eq!(rt.invalid_releases(), 0);
    }

    #[test]
    fn bytes_are_copied_out() {
        let rt = MemoryRuntime::new();
        let data = bytes_to_foreign(&rt, b"\x00\x01\xff").unwrap();
        let copy = foreign_to_bytes(&rt, data.handle()).unwrap();
        drop(data);
        assert_eq!(&copy[..], b"\x00\x01\xff");
        assert_eq!(rt.live_objects(), 2);
    }

    #[test]
    fn numeric_slices_pack_native_endian() {
        let rt = MemoryRuntime::new();
        let data = numbers_to_foreign_data(&rt, &[1u16, 2, 3]).unwrap();
        let bytes = foreign_to_bytes(&rt, data.handle()).unwrap();
        let mut expected = Vec::new();
        for v in [1u16, 2, 3] {
            expected.extend_from_slice(&v.to_ne_bytes());
        }
        assert_eq!(&bytes[..], &expected[..]);

        let floats = numbers_to_foreign_data(&rt, &[1.5f64]).unwrap();
        assert_eq!(foreign_to_bytes(&rt, floats.handle()).unwrap().len(), 8);
    }

    #[test]
    fn mutable_bytes_are_a_distinct_kind() {
        let rt = MemoryRuntime::new();
        let bridge = crate::dispatch::Bridge::new(&rt);

        let mutable = bytes_to_foreign_mutable(&rt, b"\x10\x20").unwrap();
        let sealed = bytes_to_foreign(&rt, b"\x10\x20").unwrap();
        assert_eq!(
            bridge.identify(mutable.handle()).unwrap(),
            crate::type_table::TypeKind::MutableData
        );
        assert_eq!(
            bridge.identify(sealed.handle()).unwrap(),
            crate::type_table::TypeKind::Data
        );

        let expected = HostValue::Bytes(Bytes::from_static(b"\x10\x20"));
        assert_eq!(bridge.from_foreign(mutable.handle()).unwrap(), expected);
        assert_eq!(bridge.from_foreign(sealed.handle()).unwrap(), expected);
    }

    #[test]
    fn packed_numbers_read_back() {
        let rt = MemoryRuntime::new();

        let data = numbers_to_foreign_data(&rt, &[-3i8, 0, 127]).unwrap();
        assert_eq!(foreign_data_to_numbers::<i8>(&rt, data.handle()).unwrap(), [-3, 0, 127]);

        let data = numbers_to_foreign_data(&rt, &[u64::MAX, 1]).unwrap();
        assert_eq!(
            foreign_data_to_numbers::<u64>(&rt, data.handle()).unwrap(),
            [u64::MAX, 1]
        );

        let data = numbers_to_foreign_data(&rt, &[0.5f32, -2.25]).unwrap();
        assert_eq!(
            foreign_data_to_numbers::<f32>(&rt, data.handle()).unwrap(),
            [0.5, -2.25]
        );

        let data = numbers_to_foreign_data(&rt, &[f64::MIN_POSITIVE, 1e300]).unwrap();
        assert_eq!(
            foreign_data_to_numbers::<f64>(&rt, data.handle()).unwrap(),
            [f64::MIN_POSITIVE, 1e300]
        );

        let empty = numbers_to_foreign_data::<i32>(&rt, &[]).unwrap();
        assert!(foreign_data_to_numbers::<i32>(&rt, empty.handle())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn complex_elements_pack_real_then_imaginary() {
        let rt = MemoryRuntime::new();

        let values = [Complex64::new(1.5, -2.0), Complex64::new(0.0, 3.25)];
        let data = numbers_to_foreign_data(&rt, &values).unwrap();
        let bytes = foreign_to_bytes(&rt, data.handle()).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[..8], &1.5f64.to_ne_bytes());
        assert_eq!(&bytes[8..16], &(-2.0f64).to_ne_bytes());
        assert_eq!(
            foreign_data_to_numbers::<Complex64>(&rt, data.handle()).unwrap(),
            values
        );

        let narrow = [num_complex::Complex32::new(-1.0, 0.5)];
        let data = numbers_to_foreign_data(&rt, &narrow).unwrap();
        assert_eq!(
            foreign_data_to_numbers::<num_complex::Complex32>(&rt, data.handle()).unwrap(),
            narrow
        );
    }

    #[test]
    fn mutable_packed_data() {
        let rt = MemoryRuntime::new();
        let bridge = crate::dispatch::Bridge::new(&rt);

        let data = numbers_to_foreign_mutable_data(&rt, &[7i32, -7]).unwrap();
        assert_eq!(
            bridge.identify(data.handle()).unwrap(),
            crate::type_table::TypeKind::MutableData
        );
        assert_eq!(
            foreign_data_to_numbers::<i32>(&rt, data.handle()).unwrap(),
            [7, -7]
        );
    }

    #[test]
    fn ragged_data_is_a_runtime_error() {
        let rt = MemoryRuntime::new();
        let data = bytes_to_foreign(&rt, &[0u8; 6]).unwrap();

        let err = foreign_data_to_numbers::<u32>(&rt, data.handle()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Runtime);
        assert!(err.to_string().contains("6 bytes"));

        assert_eq!(foreign_data_to_numbers::<u16>(&rt, data.handle()).unwrap().len(), 3);

        let text = text_to_foreign(&rt, "not data").unwrap();
        let err = foreign_data_to_numbers::<u8>(&rt, text.handle()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }
}
