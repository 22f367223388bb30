//! Array, dictionary and set conversion.
//!
//! Every conversion to the foreign side goes through a mutable staging
//! container:
//!
//! 1. create the staging container
//! 2. convert each element, insert it (the container retains it), and drop
//!    the local reference
//! 3. seal: copy into an immutable container and release the staging one
//!
//! Any error drops the staging guard, which releases everything inserted so
//! far. The sealed container is the only reference that leaves.

use num_complex::Complex64;
use ocbridge_runtime::{Handle, Owned, Runtime};

use crate::dispatch::Bridge;
use crate::error::{BridgeError, Result};
use crate::primitives;
use crate::value::HostValue;

impl<'rt> Bridge<'rt> {
    // === Arrays ===

    pub fn list_to_foreign(&self, items: &[HostValue]) -> Result<Owned<'rt>> {
        self.list_to_foreign_at(items, 0)
    }

    /// Build the staging array and return it unsealed.
    pub fn list_to_foreign_mutable(&self, items: &[HostValue]) -> Result<Owned<'rt>> {
        self.stage_list(items, 0)
    }

    pub(crate) fn list_to_foreign_at(
        &self,
        items: &[HostValue],
        depth: usize,
    ) -> Result<Owned<'rt>> {
        let staging = self.stage_list(items, depth)?;
        self.seal(staging, "OCArray", |rt, h| rt.array_create_copy(h))
    }

    fn stage_list(&self, items: &[HostValue], depth: usize) -> Result<Owned<'rt>> {
        let depth = self.descend(depth)?;
        let rt = self.runtime;
        let staging = Owned::adopt(rt, rt.array_create_mutable(items.len())?);
        for item in items {
            let element = self.to_foreign_at(item, depth)?;
            rt.array_append(staging.handle(), element.handle())?;
        }
        Ok(staging)
    }

    pub fn foreign_to_list(&self, array: Handle) -> Result<Vec<HostValue>> {
        self.foreign_to_list_at(array, 0)
    }

    pub(crate) fn foreign_to_list_at(&self, array: Handle, depth: usize) -> Result<Vec<HostValue>> {
        let depth = self.descend(depth)?;
        let items = self.read_array(array, depth)?;
        tracing::debug!(count = items.len(), "read array");
        Ok(items)
    }

    fn read_array(&self, array: Handle, depth: usize) -> Result<Vec<HostValue>> {
        let rt = self.runtime;
        let count = rt.array_count(array)?;
        let mut items = Vec::with_capacity(count);
        for index in 0..count {
            let element = rt.array_value_at(array, index)?;
            items.push(self.from_foreign_at(element, depth)?);
        }
        Ok(items)
    }

    // === Dictionaries ===

    /// Convert key-value pairs into a foreign dictionary.
    ///
    /// Keys are coerced to text (see [`dict_key_text`]). When two keys
    /// coerce to the same text the later entry wins.
    pub fn dict_to_foreign(&self, entries: &[(HostValue, HostValue)]) -> Result<Owned<'rt>> {
        self.dict_to_foreign_at(entries, 0)
    }

    /// Build the staging dictionary and return it unsealed.
    pub fn dict_to_foreign_mutable(
        &self,
        entries: &[(HostValue, HostValue)],
    ) -> Result<Owned<'rt>> {
        self.stage_dict(entries, 0)
    }

    pub(crate) fn dict_to_foreign_at(
        &self,
        entries: &[(HostValue, HostValue)],
        depth: usize,
    ) -> Result<Owned<'rt>> {
        let staging = self.stage_dict(entries, depth)?;
        self.seal(staging, "OCDictionary", |rt, h| rt.dictionary_create_copy(h))
    }

    fn stage_dict(&self, entries: &[(HostValue, HostValue)], depth: usize) -> Result<Owned<'rt>> {
        let depth = self.descend(depth)?;
        let keys = entries
            .iter()
            .map(|(key, _)| dict_key_text(key))
            .collect::<Result<Vec<_>>>()?;

        let rt = self.runtime;
        let staging = Owned::adopt(rt, rt.dictionary_create_mutable(entries.len())?);
        for (key, (_, value)) in keys.iter().zip(entries) {
            let key = primitives::text_to_foreign(rt, key)?;
            let value = self.to_foreign_at(value, depth)?;
            rt.dictionary_set_value(staging.handle(), key.handle(), value.handle())?;
        }
        Ok(staging)
    }

    pub fn foreign_to_dict(&self, dictionary: Handle) -> Result<Vec<(HostValue, HostValue)>> {
        self.foreign_to_dict_at(dictionary, 0)
    }

    pub(crate) fn foreign_to_dict_at(
        &self,
        dictionary: Handle,
        depth: usize,
    ) -> Result<Vec<(HostValue, HostValue)>> {
        let depth = self.descend(depth)?;
        let rt = self.runtime;
        let count = rt.dictionary_count(dictionary)?;
        let mut keys = vec![None; count];
        let mut values = vec![None; count];
        rt.dictionary_keys_and_values(dictionary, &mut keys, &mut values)?;

        let mut entries = Vec::with_capacity(count);
        for (key, value) in keys.into_iter().zip(values) {
            let (Some(key), Some(value)) = (key, value) else {
                return Err(BridgeError::runtime_error(
                    "runtime left a dictionary slot empty",
                ));
            };
            entries.push((
                self.from_foreign_at(key, depth)?,
                self.from_foreign_at(value, depth)?,
            ));
        }
        tracing::debug!(count, "read dictionary");
        Ok(entries)
    }

    // === Sets ===

    /// Convert hashable values into a foreign set.
    ///
    /// Lists, dictionaries and sets are rejected before anything is allocated.
    pub fn set_to_foreign(&self, items: &[HostValue]) -> Result<Owned<'rt>> {
        self.set_to_foreign_at(items, 0)
    }

    /// Build the staging set and return it unsealed.
    pub fn set_to_foreign_mutable(&self, items: &[HostValue]) -> Result<Owned<'rt>> {
        self.stage_set(items, 0)
    }

    pub(crate) fn set_to_foreign_at(
        &self,
        items: &[HostValue],
        depth: usize,
    ) -> Result<Owned<'rt>> {
        let staging = self.stage_set(items, depth)?;
        self.seal(staging, "OCSet", |rt, h| rt.set_create_copy(h))
    }

    fn stage_set(&self, items: &[HostValue], depth: usize) -> Result<Owned<'rt>> {
        let depth = self.descend(depth)?;
        if let Some(unhashable) = items.iter().find(|item| item.is_container()) {
            return Err(BridgeError::type_error(format!(
                "unhashable set element of type {}",
                unhashable.type_name()
            )));
        }

        let rt = self.runtime;
        let staging = Owned::adopt(rt, rt.set_create_mutable()?);
        for item in items {
            let element = self.to_foreign_at(item, depth)?;
            rt.set_add(staging.handle(), element.handle())?;
        }
        Ok(staging)
    }

    pub fn foreign_to_set(&self, set: Handle) -> Result<Vec<HostValue>> {
        self.foreign_to_set_at(set, 0)
    }

    pub(crate) fn foreign_to_set_at(&self, set: Handle, depth: usize) -> Result<Vec<HostValue>> {
        let depth = self.descend(depth)?;
        let rt = self.runtime;
        let members = Owned::adopt(rt, rt.set_values(set)?);
        let items = self.read_array(members.handle(), depth)?;
        tracing::debug!(count = items.len(), "read set");
        Ok(items)
    }

    // === Sealing ===

    pub(crate) fn seal(
        &self,
        staging: Owned<'rt>,
        kind: &'static str,
        copy: impl FnOnce(&dyn Runtime, Handle) -> ocbridge_runtime::Result<Handle>,
    ) -> Result<Owned<'rt>> {
        let rt = self.runtime;
        let sealed = Owned::adopt(rt, copy(rt, staging.handle())?);
        drop(staging);
        tracing::debug!(kind, handle = ?sealed.handle(), "sealed container");
        Ok(sealed)
    }
}

/// Text a host value takes as a foreign dictionary key.
///
/// Text keys pass through. Scalars are written the way the host prints them:
/// `1` as `"1"`, `true` as `"True"`, `1.5` as `"1.5"`, `None` as `"None"`.
/// Containers are unhashable and domain objects need a key text.
pub fn dict_key_text(key: &HostValue) -> Result<String> {
    let text = match key {
        HostValue::Text(s) => s.clone(),
        HostValue::Int(i) => i.to_string(),
        HostValue::Bool(true) => "True".to_string(),
        HostValue::Bool(false) => "False".to_string(),
        HostValue::None => "None".to_string(),
        HostValue::Float(x) => float_key_text(*x),
        HostValue::Complex(c) => complex_key_text(*c),
        HostValue::Bytes(b) => format!("b'{}'", b.escape_ascii()),
        HostValue::Handle(token) => token.to_string(),
        HostValue::Object(obj) => obj.key_text().ok_or_else(|| {
            BridgeError::type_error(format!(
                "{} cannot be used as a dictionary key",
                obj.type_name()
            ))
        })?,
        HostValue::List(_) | HostValue::Dict(_) | HostValue::Set(_) => {
            return Err(BridgeError::type_error(format!(
                "unhashable dictionary key of type {}",
                key.type_name()
            )))
        }
    };
    Ok(text)
}

fn float_key_text(x: f64) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else if x == f64::INFINITY {
        "inf".to_string()
    } else if x == f64::NEG_INFINITY {
        "-inf".to_string()
    } else if x != 0.0 && (x.abs() < 1e-4 || x.abs() >= 1e16) {
        scientific_text(x)
    } else {
        format!("{:?}", x)
    }
}

/// Shortest digits with a signed, two-digit exponent: `1e+16`, `1.5e-07`.
fn scientific_text(x: f64) -> String {
    let shortest = format!("{:e}", x);
    let Some((mantissa, exponent)) = shortest.split_once('e') else {
        return shortest;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}

fn complex_key_text(c: Complex64) -> String {
    let im = format!("{}j", complex_component(c.im.abs()));
    if c.re == 0.0 && c.re.is_sign_positive() {
        if c.im.is_sign_negative() {
            return format!("-{}", im);
        }
        return im;
    }
    let sign = if c.im.is_sign_negative() { '-' } else { '+' };
    format!("({}{}{})", complex_component(c.re), sign, im)
}

/// Components print without a trailing `.0` when integral.
fn complex_component(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
        format!("{}", x as i64)
    } else {
        float_key_text(x)
    }
}
