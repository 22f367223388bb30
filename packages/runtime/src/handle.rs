//! Opaque foreign handles.

use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;

/// An opaque reference to a foreign-runtime object.
///
/// A `Handle` is just the pointer. It carries no ownership by itself: whether
/// the holder must release it is decided by the function that produced it
/// (see [`crate::Owned`] for the owned case). Null is not a valid handle;
/// APIs that allow absence use `Option<Handle>`.
///
/// Handles wrap a raw pointer and are therefore neither `Send` nor `Sync`.
/// The foreign reference count is not assumed to be atomic.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(NonNull<c_void>);

impl Handle {
    /// Wrap a raw pointer received from the runtime. Null yields `None`.
    pub fn from_raw(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Handle)
    }

    /// Wrap a non-null pointer.
    pub fn from_non_null(ptr: NonNull<c_void>) -> Self {
        Handle(ptr)
    }

    /// The raw pointer, for passing back to the runtime.
    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }

    /// The pointer-sized integer form of this handle.
    ///
    /// Used as an opaque token for objects the bridge does not understand.
    pub fn token(self) -> usize {
        self.0.as_ptr() as usize
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:#x})", self.token())
    }
}
