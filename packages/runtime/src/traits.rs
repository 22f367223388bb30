//! The runtime boundary trait.

use crate::{ForeignTypeId, Handle, Number, Result, TypeDescriptor};

/// The foreign runtime's object API.
///
/// Each method corresponds to one function of the runtime's C-ABI surface.
/// Where the C function would return NULL or `false`, the method returns an
/// error instead.
///
/// # Ownership
///
/// - `*_create*`, `retain` and `set_values` return **owned** handles: the
///   caller releases each exactly once.
/// - `array_value_at`, `dictionary_keys_and_values` and `boolean` return
///   **borrowed** handles: the caller must not release them.
/// - Every method taking a handle argument borrows it and never releases it.
/// - Inserting into a container (`array_append`, `dictionary_set_value`,
///   `set_add`) retains the element on behalf of the container.
///
/// # Object Safety
///
/// This trait is object-safe: the bridge works against `&dyn Runtime`.
pub trait Runtime {
    // === Lifecycle ===

    /// Increment the reference count. Returns the same handle.
    fn retain(&self, handle: Handle) -> Result<Handle>;

    /// Decrement the reference count; the runtime frees the object at zero.
    ///
    /// Singletons (the two booleans) ignore both `retain` and `release`.
    fn release(&self, handle: Handle);

    /// The runtime type identifier of the referenced object.
    fn type_id_of(&self, handle: Handle) -> Result<ForeignTypeId>;

    /// Every type the runtime has registered, builtin and custom.
    fn registered_types(&self) -> Vec<TypeDescriptor>;

    // === Text ===

    /// Create a string from UTF-8 text.
    fn string_create(&self, text: &str, mutable: bool) -> Result<Handle>;

    /// Lend the string's UTF-8 bytes to `visit` for the duration of the call.
    fn string_bytes(&self, string: Handle, visit: &mut dyn FnMut(&[u8])) -> Result<()>;

    // === Numbers ===

    fn number_create(&self, number: Number) -> Result<Handle>;

    fn number_value(&self, number: Handle) -> Result<Number>;

    // === Booleans ===

    /// The process-wide singleton for `value`. Borrowed.
    fn boolean(&self, value: bool) -> Handle;

    fn boolean_value(&self, boolean: Handle) -> Result<bool>;

    // === Byte buffers ===

    fn data_create(&self, bytes: &[u8], mutable: bool) -> Result<Handle>;

    /// Lend the buffer's bytes to `visit` for the duration of the call.
    fn data_bytes(&self, data: Handle, visit: &mut dyn FnMut(&[u8])) -> Result<()>;

    // === Arrays ===

    fn array_create_mutable(&self, capacity: usize) -> Result<Handle>;

    fn array_append(&self, array: Handle, value: Handle) -> Result<()>;

    fn array_count(&self, array: Handle) -> Result<usize>;

    /// Element at `index`. Borrowed.
    fn array_value_at(&self, array: Handle, index: usize) -> Result<Handle>;

    /// Immutable copy of an array; elements are retained by the copy.
    fn array_create_copy(&self, array: Handle) -> Result<Handle>;

    // === Dictionaries ===

    fn dictionary_create_mutable(&self, capacity: usize) -> Result<Handle>;

    /// Insert or replace the value for `key`. `key` must be a string.
    fn dictionary_set_value(&self, dictionary: Handle, key: Handle, value: Handle) -> Result<()>;

    fn dictionary_count(&self, dictionary: Handle) -> Result<usize>;

    /// Fill caller-allocated buffers with borrowed keys and values.
    ///
    /// Both buffers must hold exactly `dictionary_count` slots.
    fn dictionary_keys_and_values(
        &self,
        dictionary: Handle,
        keys: &mut [Option<Handle>],
        values: &mut [Option<Handle>],
    ) -> Result<()>;

    fn dictionary_create_copy(&self, dictionary: Handle) -> Result<Handle>;

    // === Sets ===

    fn set_create_mutable(&self) -> Result<Handle>;

    /// Add `value` unless an equal member is already present.
    fn set_add(&self, set: Handle, value: Handle) -> Result<()>;

    fn set_count(&self, set: Handle) -> Result<usize>;

    /// Materialize the members into a new array. Owned.
    ///
    /// Sets expose no stepwise iterator; this is the only way to walk one.
    fn set_values(&self, set: Handle) -> Result<Handle>;

    fn set_create_copy(&self, set: Handle) -> Result<Handle>;

    // === Index arrays ===

    fn index_array_create_mutable(&self, capacity: usize) -> Result<Handle>;

    fn index_array_append(&self, array: Handle, value: i64) -> Result<()>;

    fn index_array_count(&self, array: Handle) -> Result<usize>;

    fn index_array_value_at(&self, array: Handle, index: usize) -> Result<i64>;

    fn index_array_create_copy(&self, array: Handle) -> Result<Handle>;

    // === Index sets ===
    //
    // No enumeration primitive: only the count and both ends are observable.

    fn index_set_create_mutable(&self) -> Result<Handle>;

    fn index_set_add(&self, set: Handle, value: i64) -> Result<()>;

    fn index_set_count(&self, set: Handle) -> Result<usize>;

    fn index_set_first(&self, set: Handle) -> Result<Option<i64>>;

    fn index_set_last(&self, set: Handle) -> Result<Option<i64>>;

    fn index_set_create_copy(&self, set: Handle) -> Result<Handle>;

    // === Index pair sets ===
    //
    // No enumeration primitive: pairs are found only by probing an index.

    fn index_pair_set_create_mutable(&self) -> Result<Handle>;

    fn index_pair_set_add(&self, set: Handle, index: i64, value: i64) -> Result<()>;

    fn index_pair_set_count(&self, set: Handle) -> Result<usize>;

    fn index_pair_set_value_for_index(&self, set: Handle, index: i64) -> Result<Option<i64>>;

    fn index_pair_set_create_copy(&self, set: Handle) -> Result<Handle>;
}
