//! The in-memory runtime.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ptr::NonNull;

use ocbridge_runtime::{
    ForeignTypeId, Handle, Number, Result, Runtime, RuntimeError, TypeDescriptor,
};

use crate::object::{self, ids, is_mutable, payloads_equal, NumberRepr, Object, Payload};

type Objects = HashMap<usize, Box<Object>>;

/// A reference-counted object universe living in this process.
///
/// Each object is boxed and addressed by its heap pointer, so handles are real
/// pointers. Objects are looked up by address, never dereferenced through the
/// handle, which lets the runtime reject stale or foreign handles.
///
/// Freed objects keep their box, emptied, for the life of the runtime. An
/// address is therefore never handed out twice, and a stale handle can never
/// resolve to a newer object.
///
/// `MemoryRuntime` is single-threaded (`!Sync`): it uses interior mutability
/// so that every operation takes `&self`, like a C API would.
pub struct MemoryRuntime {
    objects: RefCell<Objects>,
    types: Vec<TypeDescriptor>,
    true_handle: Handle,
    false_handle: Handle,
    allocations: Cell<usize>,
    /// Remaining allocations allowed before failure injection kicks in.
    failure_budget: Cell<Option<usize>>,
    invalid_releases: Cell<usize>,
    /// Emptied boxes of freed objects, held to pin their addresses.
    retired: RefCell<Vec<Box<Object>>>,
}

impl MemoryRuntime {
    /// Create a runtime with the builtin types and the two boolean singletons.
    pub fn new() -> Self {
        let mut objects = Objects::new();
        let true_handle = insert(
            &mut objects,
            Object::singleton(ids::BOOLEAN, Payload::Boolean(true)),
        );
        let false_handle = insert(
            &mut objects,
            Object::singleton(ids::BOOLEAN, Payload::Boolean(false)),
        );

        let types = object::BUILTIN_TYPES
            .iter()
            .map(|(id, name)| TypeDescriptor::new(*id, *name))
            .collect();

        Self {
            objects: RefCell::new(objects),
            types,
            true_handle,
            false_handle,
            allocations: Cell::new(0),
            failure_budget: Cell::new(None),
            invalid_releases: Cell::new(0),
            retired: RefCell::new(Vec::new()),
        }
    }

    /// Register a custom type whose objects carry an opaque byte payload.
    ///
    /// Registering an existing name returns the existing identifier.
    pub fn register_type(&mut self, name: &str) -> ForeignTypeId {
        if let Some(existing) = self.types.iter().find(|t| t.name == name) {
            return existing.id;
        }
        let custom = self
            .types
            .iter()
            .filter(|t| t.id.0 >= ids::FIRST_CUSTOM)
            .count() as u32;
        let id = ForeignTypeId(ids::FIRST_CUSTOM + custom);
        self.types.push(TypeDescriptor::new(id, name));
        id
    }

    /// Create an object of a custom type. Owned.
    pub fn create_opaque(&self, type_id: ForeignTypeId, payload: &[u8]) -> Result<Handle> {
        if type_id.0 < ids::FIRST_CUSTOM || self.type_name(type_id).is_none() {
            return Err(RuntimeError::TypeMismatch {
                expected: "a registered custom type",
                found: type_id.to_string(),
            });
        }
        self.allocate(
            "opaque object",
            Object::new(type_id, Payload::Opaque(payload.to_vec())),
        )
    }

    /// Copy of a custom object's payload.
    pub fn opaque_payload(&self, handle: Handle) -> Result<Vec<u8>> {
        self.with_object(handle, |obj| match &obj.payload {
            Payload::Opaque(bytes) => Ok(bytes.clone()),
            _ => Err(self.mismatch("a custom object", obj)),
        })
    }

    /// Create a number whose stored layout tag is not one the runtime decodes.
    pub fn number_with_unknown_layout(&self, layout: u8) -> Result<Handle> {
        self.allocate(
            "OCNumber",
            Object::new(ids::NUMBER, Payload::Number(NumberRepr::Unknown(layout))),
        )
    }

    // === Probes ===

    /// Number of objects currently alive, singletons included.
    pub fn live_objects(&self) -> usize {
        self.objects.borrow().len()
    }

    /// Number of objects created since construction (singletons excluded).
    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    /// Let the next `successes` allocations succeed, then fail every one after.
    pub fn fail_allocations_after(&self, successes: usize) {
        self.failure_budget.set(Some(successes));
    }

    /// Stop injecting allocation failures.
    pub fn clear_allocation_failure(&self) {
        self.failure_budget.set(None);
    }

    /// Number of `release` calls that named a handle with no live object.
    pub fn invalid_releases(&self) -> usize {
        self.invalid_releases.get()
    }

    /// Current retain count of a live object.
    pub fn retain_count(&self, handle: Handle) -> Option<usize> {
        self.objects
            .borrow()
            .get(&handle.token())
            .map(|obj| obj.retain_count)
    }

    /// Registered name of a type identifier.
    pub fn type_name(&self, type_id: ForeignTypeId) -> Option<&str> {
        self.types
            .iter()
            .find(|t| t.id == type_id)
            .map(|t| t.name.as_str())
    }

    // === Internals ===

    fn allocate(&self, kind: &'static str, obj: Object) -> Result<Handle> {
        if let Some(remaining) = self.failure_budget.get() {
            if remaining == 0 {
                tracing::debug!(kind, "injected allocation failure");
                return Err(RuntimeError::AllocationFailed { kind });
            }
            self.failure_budget.set(Some(remaining - 1));
        }
        self.allocations.set(self.allocations.get() + 1);
        Ok(insert(&mut self.objects.borrow_mut(), obj))
    }

    fn type_label(&self, type_id: ForeignTypeId) -> String {
        self.type_name(type_id)
            .map(str::to_string)
            .unwrap_or_else(|| type_id.to_string())
    }

    fn mismatch(&self, expected: &'static str, obj: &Object) -> RuntimeError {
        RuntimeError::TypeMismatch {
            expected,
            found: self.type_label(obj.type_id),
        }
    }

    fn with_object<T>(&self, handle: Handle, f: impl FnOnce(&Object) -> Result<T>) -> Result<T> {
        let objects = self.objects.borrow();
        let obj = objects
            .get(&handle.token())
            .ok_or(RuntimeError::InvalidHandle)?;
        f(obj)
    }

    /// Check that `container` is a live mutable object of `expected` kind.
    fn check_mutable(
        &self,
        objects: &Objects,
        container: Handle,
        expected: ForeignTypeId,
        expected_name: &'static str,
    ) -> Result<()> {
        let obj = objects
            .get(&container.token())
            .ok_or(RuntimeError::InvalidHandle)?;
        if obj.type_id == expected {
            Ok(())
        } else if is_mutable(obj.type_id) {
            Err(self.mismatch(expected_name, obj))
        } else {
            Err(RuntimeError::Immutable {
                type_name: self.type_label(obj.type_id),
            })
        }
    }

    fn retain_in(objects: &mut Objects, handle: Handle) -> Result<()> {
        let obj = objects
            .get_mut(&handle.token())
            .ok_or(RuntimeError::InvalidHandle)?;
        if !obj.singleton {
            obj.retain_count += 1;
        }
        Ok(())
    }

    /// Immutable copy of a handle-holding container, retaining each element.
    fn copy_container(
        &self,
        source: Handle,
        accepted: &[ForeignTypeId],
        expected_name: &'static str,
        sealed_type: ForeignTypeId,
        sealed_name: &'static str,
    ) -> Result<Handle> {
        let payload = {
            let objects = self.objects.borrow();
            let obj = objects
                .get(&source.token())
                .ok_or(RuntimeError::InvalidHandle)?;
            if !accepted.contains(&obj.type_id) {
                return Err(self.mismatch(expected_name, obj));
            }
            match &obj.payload {
                Payload::Array(items) => Payload::Array(items.clone()),
                Payload::Set(items) => Payload::Set(items.clone()),
                Payload::Dictionary(entries) => Payload::Dictionary(entries.clone()),
                Payload::IndexArray(values) => Payload::IndexArray(values.clone()),
                Payload::IndexSet(values) => Payload::IndexSet(values.clone()),
                Payload::IndexPairSet(pairs) => Payload::IndexPairSet(pairs.clone()),
                _ => return Err(self.mismatch(expected_name, obj)),
            }
        };

        let children = payload.children();
        let copy = self.allocate(sealed_name, Object::new(sealed_type, payload))?;
        let mut objects = self.objects.borrow_mut();
        for child in children {
            Self::retain_in(&mut objects, child)?;
        }
        Ok(copy)
    }

    fn count_of(
        &self,
        handle: Handle,
        accepted: &[ForeignTypeId],
        expected: &'static str,
    ) -> Result<usize> {
        self.with_object(handle, |obj| {
            if !accepted.contains(&obj.type_id) {
                return Err(self.mismatch(expected, obj));
            }
            Ok(match &obj.payload {
                Payload::Array(items) | Payload::Set(items) => items.len(),
                Payload::Dictionary(entries) => entries.len(),
                Payload::IndexArray(values) => values.len(),
                Payload::IndexSet(values) => values.len(),
                Payload::IndexPairSet(pairs) => pairs.len(),
                _ => return Err(self.mismatch(expected, obj)),
            })
        })
    }

    fn with_index_set<T>(&self, set: Handle, f: impl FnOnce(&BTreeSet<i64>) -> T) -> Result<T> {
        self.with_object(set, |obj| match &obj.payload {
            Payload::IndexSet(values) => Ok(f(values)),
            _ => Err(self.mismatch("OCIndexSet", obj)),
        })
    }
}

impl Default for MemoryRuntime {
    fn default() -> Self {
        Self::new()
    }
}

fn insert(objects: &mut Objects, obj: Object) -> Handle {
    let boxed = Box::new(obj);
    let handle = Handle::from_non_null(NonNull::from(&*boxed).cast());
    objects.insert(handle.token(), boxed);
    handle
}

const ARRAYS: &[ForeignTypeId] = &[ids::ARRAY, ids::MUTABLE_ARRAY];
const DICTIONARIES: &[ForeignTypeId] = &[ids::DICTIONARY, ids::MUTABLE_DICTIONARY];
const SETS: &[ForeignTypeId] = &[ids::SET, ids::MUTABLE_SET];
const INDEX_ARRAYS: &[ForeignTypeId] = &[ids::INDEX_ARRAY, ids::MUTABLE_INDEX_ARRAY];
const INDEX_SETS: &[ForeignTypeId] = &[ids::INDEX_SET, ids::MUTABLE_INDEX_SET];
const INDEX_PAIR_SETS: &[ForeignTypeId] = &[ids::INDEX_PAIR_SET, ids::MUTABLE_INDEX_PAIR_SET];

impl Runtime for MemoryRuntime {
    fn retain(&self, handle: Handle) -> Result<Handle> {
        Self::retain_in(&mut self.objects.borrow_mut(), handle)?;
        Ok(handle)
    }

    fn release(&self, handle: Handle) {
        // Iterative so that freeing a deep container cannot overflow the stack.
        let mut pending = vec![handle];
        while let Some(next) = pending.pop() {
            let mut objects = self.objects.borrow_mut();
            let Some(obj) = objects.get_mut(&next.token()) else {
                self.invalid_releases.set(self.invalid_releases.get() + 1);
                tracing::warn!(handle = ?next, "release of a handle with no live object");
                continue;
            };
            if obj.singleton {
                continue;
            }
            obj.retain_count -= 1;
            if obj.retain_count == 0 {
                if let Some(mut freed) = objects.remove(&next.token()) {
                    tracing::trace!(handle = ?next, type_id = %freed.type_id, "freed");
                    pending.extend(freed.payload.children());
                    freed.payload = Payload::Boolean(false);
                    self.retired.borrow_mut().push(freed);
                }
            }
        }
    }

    fn type_id_of(&self, handle: Handle) -> Result<ForeignTypeId> {
        self.with_object(handle, |obj| Ok(obj.type_id))
    }

    fn registered_types(&self) -> Vec<TypeDescriptor> {
        self.types.clone()
    }

    fn string_create(&self, text: &str, mutable: bool) -> Result<Handle> {
        let (type_id, kind) = if mutable {
            (ids::MUTABLE_STRING, "OCMutableString")
        } else {
            (ids::STRING, "OCString")
        };
        self.allocate(kind, Object::new(type_id, Payload::String(text.to_string())))
    }

    fn string_bytes(&self, string: Handle, visit: &mut dyn FnMut(&[u8])) -> Result<()> {
        self.with_object(string, |obj| match &obj.payload {
            Payload::String(text) => {
                visit(text.as_bytes());
                Ok(())
            }
            _ => Err(self.mismatch("OCString", obj)),
        })
    }

    fn number_create(&self, number: Number) -> Result<Handle> {
        self.allocate(
            "OCNumber",
            Object::new(ids::NUMBER, Payload::Number(NumberRepr::Known(number))),
        )
    }

    fn number_value(&self, number: Handle) -> Result<Number> {
        self.with_object(number, |obj| match &obj.payload {
            Payload::Number(NumberRepr::Known(n)) => Ok(*n),
            Payload::Number(NumberRepr::Unknown(layout)) => Err(RuntimeError::UnknownNumberLayout {
                layout: *layout,
                type_name: self.type_label(obj.type_id),
            }),
            _ => Err(self.mismatch("OCNumber", obj)),
        })
    }

    fn boolean(&self, value: bool) -> Handle {
        if value {
            self.true_handle
        } else {
            self.false_handle
        }
    }

    fn boolean_value(&self, boolean: Handle) -> Result<bool> {
        self.with_object(boolean, |obj| match &obj.payload {
            Payload::Boolean(b) => Ok(*b),
            _ => Err(self.mismatch("OCBoolean", obj)),
        })
    }

    fn data_create(&self, bytes: &[u8], mutable: bool) -> Result<Handle> {
        let (type_id, kind) = if mutable {
            (ids::MUTABLE_DATA, "OCMutableData")
        } else {
            (ids::DATA, "OCData")
        };
        self.allocate(kind, Object::new(type_id, Payload::Data(bytes.to_vec())))
    }

    fn data_bytes(&self, data: Handle, visit: &mut dyn FnMut(&[u8])) -> Result<()> {
        self.with_object(data, |obj| match &obj.payload {
            Payload::Data(bytes) => {
                visit(bytes);
                Ok(())
            }
            _ => Err(self.mismatch("OCData", obj)),
        })
    }

    fn array_create_mutable(&self, capacity: usize) -> Result<Handle> {
        self.allocate(
            "OCMutableArray",
            Object::new(ids::MUTABLE_ARRAY, Payload::Array(Vec::with_capacity(capacity))),
        )
    }

    fn array_append(&self, array: Handle, value: Handle) -> Result<()> {
        let mut objects = self.objects.borrow_mut();
        self.check_mutable(&objects, array, ids::MUTABLE_ARRAY, "OCMutableArray")?;
        Self::retain_in(&mut objects, value)?;
        if let Some(Payload::Array(items)) =
            objects.get_mut(&array.token()).map(|o| &mut o.payload)
        {
            items.push(value);
        }
        Ok(())
    }

    fn array_count(&self, array: Handle) -> Result<usize> {
        self.count_of(array, ARRAYS, "OCArray")
    }

    fn array_value_at(&self, array: Handle, index: usize) -> Result<Handle> {
        self.with_object(array, |obj| match &obj.payload {
            Payload::Array(items) => items
                .get(index)
                .copied()
                .ok_or(RuntimeError::IndexOutOfBounds {
                    index,
                    count: items.len(),
                }),
            _ => Err(self.mismatch("OCArray", obj)),
        })
    }

    fn array_create_copy(&self, array: Handle) -> Result<Handle> {
        self.copy_container(array, ARRAYS, "OCArray", ids::ARRAY, "OCArray")
    }

    fn dictionary_create_mutable(&self, capacity: usize) -> Result<Handle> {
        self.allocate(
            "OCMutableDictionary",
            Object::new(
                ids::MUTABLE_DICTIONARY,
                Payload::Dictionary(Vec::with_capacity(capacity)),
            ),
        )
    }

    fn dictionary_set_value(&self, dictionary: Handle, key: Handle, value: Handle) -> Result<()> {
        let replaced = {
            let mut objects = self.objects.borrow_mut();
            self.check_mutable(
                &objects,
                dictionary,
                ids::MUTABLE_DICTIONARY,
                "OCMutableDictionary",
            )?;
            let key_obj = objects
                .get(&key.token())
                .ok_or(RuntimeError::InvalidHandle)?;
            if !matches!(key_obj.payload, Payload::String(_)) {
                return Err(self.mismatch("OCString", key_obj));
            }
            if !objects.contains_key(&value.token()) {
                return Err(RuntimeError::InvalidHandle);
            }

            let existing = match objects.get(&dictionary.token()).map(|o| &o.payload) {
                Some(Payload::Dictionary(entries)) => entries.iter().position(|(k, _)| {
                    *k == key
                        || match (objects.get(&k.token()), objects.get(&key.token())) {
                            (Some(a), Some(b)) => payloads_equal(&a.payload, &b.payload),
                            _ => false,
                        }
                }),
                _ => None,
            };

            Self::retain_in(&mut objects, value)?;
            if existing.is_none() {
                Self::retain_in(&mut objects, key)?;
            }
            match objects.get_mut(&dictionary.token()).map(|o| &mut o.payload) {
                Some(Payload::Dictionary(entries)) => match existing {
                    Some(position) => Some(std::mem::replace(&mut entries[position].1, value)),
                    None => {
                        entries.push((key, value));
                        None
                    }
                },
                _ => None,
            }
        };

        if let Some(old) = replaced {
            self.release(old);
        }
        Ok(())
    }

    fn dictionary_count(&self, dictionary: Handle) -> Result<usize> {
        self.count_of(dictionary, DICTIONARIES, "OCDictionary")
    }

    fn dictionary_keys_and_values(
        &self,
        dictionary: Handle,
        keys: &mut [Option<Handle>],
        values: &mut [Option<Handle>],
    ) -> Result<()> {
        self.with_object(dictionary, |obj| match &obj.payload {
            Payload::Dictionary(entries) => {
                for found in [keys.len(), values.len()] {
                    if found != entries.len() {
                        return Err(RuntimeError::BufferSizeMismatch {
                            expected: entries.len(),
                            found,
                        });
                    }
                }
                for (i, (key, value)) in entries.iter().enumerate() {
                    keys[i] = Some(*key);
                    values[i] = Some(*value);
                }
                Ok(())
            }
            _ => Err(self.mismatch("OCDictionary", obj)),
        })
    }

    fn dictionary_create_copy(&self, dictionary: Handle) -> Result<Handle> {
        self.copy_container(
            dictionary,
            DICTIONARIES,
            "OCDictionary",
            ids::DICTIONARY,
            "OCDictionary",
        )
    }

    fn set_create_mutable(&self) -> Result<Handle> {
        self.allocate(
            "OCMutableSet",
            Object::new(ids::MUTABLE_SET, Payload::Set(Vec::new())),
        )
    }

    fn set_add(&self, set: Handle, value: Handle) -> Result<()> {
        let mut objects = self.objects.borrow_mut();
        self.check_mutable(&objects, set, ids::MUTABLE_SET, "OCMutableSet")?;
        let candidate = objects
            .get(&value.token())
            .ok_or(RuntimeError::InvalidHandle)?;
        let present = match objects.get(&set.token()).map(|o| &o.payload) {
            Some(Payload::Set(members)) => members.iter().any(|m| {
                *m == value
                    || objects
                        .get(&m.token())
                        .is_some_and(|member| payloads_equal(&member.payload, &candidate.payload))
            }),
            _ => false,
        };
        if present {
            return Ok(());
        }
        Self::retain_in(&mut objects, value)?;
        if let Some(Payload::Set(members)) = objects.get_mut(&set.token()).map(|o| &mut o.payload) {
            members.push(value);
        }
        Ok(())
    }

    fn set_count(&self, set: Handle) -> Result<usize> {
        self.count_of(set, SETS, "OCSet")
    }

    fn set_values(&self, set: Handle) -> Result<Handle> {
        let members = self.with_object(set, |obj| match &obj.payload {
            Payload::Set(members) => Ok(members.clone()),
            _ => Err(self.mismatch("OCSet", obj)),
        })?;
        let array = self.allocate(
            "OCArray",
            Object::new(ids::ARRAY, Payload::Array(members.clone())),
        )?;
        let mut objects = self.objects.borrow_mut();
        for member in members {
            Self::retain_in(&mut objects, member)?;
        }
        Ok(array)
    }

    fn set_create_copy(&self, set: Handle) -> Result<Handle> {
        self.copy_container(set, SETS, "OCSet", ids::SET, "OCSet")
    }

    fn index_array_create_mutable(&self, capacity: usize) -> Result<Handle> {
        self.allocate(
            "OCMutableIndexArray",
            Object::new(
                ids::MUTABLE_INDEX_ARRAY,
                Payload::IndexArray(Vec::with_capacity(capacity)),
            ),
        )
    }

    fn index_array_append(&self, array: Handle, value: i64) -> Result<()> {
        let mut objects = self.objects.borrow_mut();
        self.check_mutable(
            &objects,
            array,
            ids::MUTABLE_INDEX_ARRAY,
            "OCMutableIndexArray",
        )?;
        if let Some(Payload::IndexArray(values)) =
            objects.get_mut(&array.token()).map(|o| &mut o.payload)
        {
            values.push(value);
        }
        Ok(())
    }

    fn index_array_count(&self, array: Handle) -> Result<usize> {
        self.count_of(array, INDEX_ARRAYS, "OCIndexArray")
    }

    fn index_array_value_at(&self, array: Handle, index: usize) -> Result<i64> {
        self.with_object(array, |obj| match &obj.payload {
            Payload::IndexArray(values) => {
                values
                    .get(index)
                    .copied()
                    .ok_or(RuntimeError::IndexOutOfBounds {
                        index,
                        count: values.len(),
                    })
            }
            _ => Err(self.mismatch("OCIndexArray", obj)),
        })
    }

    fn index_array_create_copy(&self, array: Handle) -> Result<Handle> {
        self.copy_container(
            array,
            INDEX_ARRAYS,
            "OCIndexArray",
            ids::INDEX_ARRAY,
            "OCIndexArray",
        )
    }

    fn index_set_create_mutable(&self) -> Result<Handle> {
        self.allocate(
            "OCMutableIndexSet",
            Object::new(ids::MUTABLE_INDEX_SET, Payload::IndexSet(BTreeSet::new())),
        )
    }

    fn index_set_add(&self, set: Handle, value: i64) -> Result<()> {
        let mut objects = self.objects.borrow_mut();
        self.check_mutable(&objects, set, ids::MUTABLE_INDEX_SET, "OCMutableIndexSet")?;
        if let Some(Payload::IndexSet(values)) =
            objects.get_mut(&set.token()).map(|o| &mut o.payload)
        {
            values.insert(value);
        }
        Ok(())
    }

    fn index_set_count(&self, set: Handle) -> Result<usize> {
        self.count_of(set, INDEX_SETS, "OCIndexSet")
    }

    fn index_set_first(&self, set: Handle) -> Result<Option<i64>> {
        self.with_index_set(set, |values| values.first().copied())
    }

    fn index_set_last(&self, set: Handle) -> Result<Option<i64>> {
        self.with_index_set(set, |values| values.last().copied())
    }

    fn index_set_create_copy(&self, set: Handle) -> Result<Handle> {
        self.copy_container(set, INDEX_SETS, "OCIndexSet", ids::INDEX_SET, "OCIndexSet")
    }

    fn index_pair_set_create_mutable(&self) -> Result<Handle> {
        self.allocate(
            "OCMutableIndexPairSet",
            Object::new(
                ids::MUTABLE_INDEX_PAIR_SET,
                Payload::IndexPairSet(BTreeMap::new()),
            ),
        )
    }

    fn index_pair_set_add(&self, set: Handle, index: i64, value: i64) -> Result<()> {
        let mut objects = self.objects.borrow_mut();
        self.check_mutable(
            &objects,
            set,
            ids::MUTABLE_INDEX_PAIR_SET,
            "OCMutableIndexPairSet",
        )?;
        if let Some(Payload::IndexPairSet(pairs)) =
            objects.get_mut(&set.token()).map(|o| &mut o.payload)
        {
            pairs.insert(index, value);
        }
        Ok(())
    }

    fn index_pair_set_count(&self, set: Handle) -> Result<usize> {
        self.count_of(set, INDEX_PAIR_SETS, "OCIndexPairSet")
    }

    fn index_pair_set_value_for_index(&self, set: Handle, index: i64) -> Result<Option<i64>> {
        self.with_object(set, |obj| match &obj.payload {
            Payload::IndexPairSet(pairs) => Ok(pairs.get(&index).copied()),
            _ => Err(self.mismatch("OCIndexPairSet", obj)),
        })
    }

    fn index_pair_set_create_copy(&self, set: Handle) -> Result<Handle> {
        self.copy_container(
            set,
            INDEX_PAIR_SETS,
            "OCIndexPairSet",
            ids::INDEX_PAIR_SET,
            "OCIndexPairSet",
        )
    }
}
