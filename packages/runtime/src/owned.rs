//! Scoped ownership of foreign references.

use std::fmt;
use std::mem::ManuallyDrop;

use crate::{Handle, Result, Runtime};

/// A foreign reference the holder owns, released exactly once on drop.
///
/// Every path out of a scope - normal return, `?`, or unwinding - releases
/// the reference, so error branches never need manual cleanup.
///
/// ```rust
/// use ocbridge_runtime::{Owned, Runtime, RuntimeError};
///
/// fn two_strings(rt: &dyn Runtime) -> Result<(), RuntimeError> {
///     let first = Owned::adopt(rt, rt.string_create("a", false)?);
///     // If this fails, `first` is released before the error propagates.
///     let second = Owned::adopt(rt, rt.string_create("b", false)?);
///     drop((first, second));
///     Ok(())
/// }
/// ```
pub struct Owned<'rt> {
    runtime: &'rt dyn Runtime,
    handle: Handle,
}

impl<'rt> Owned<'rt> {
    /// Take ownership of a reference the caller already owns.
    ///
    /// Use this for handles returned by the runtime's create functions.
    pub fn adopt(runtime: &'rt dyn Runtime, handle: Handle) -> Self {
        Self { runtime, handle }
    }

    /// Retain a borrowed handle, producing an owned reference.
    pub fn retain(runtime: &'rt dyn Runtime, handle: Handle) -> Result<Self> {
        let handle = runtime.retain(handle)?;
        Ok(Self { runtime, handle })
    }

    /// The handle, borrowed for as long as this guard lives.
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// The runtime this reference belongs to.
    pub fn runtime(&self) -> &'rt dyn Runtime {
        self.runtime
    }

    /// Give up the guard without releasing.
    ///
    /// The caller becomes responsible for releasing the returned handle
    /// exactly once (typically by passing it across the C boundary).
    pub fn into_raw(self) -> Handle {
        let this = ManuallyDrop::new(self);
        this.handle
    }

    /// A second owned reference to the same object.
    pub fn try_clone(&self) -> Result<Self> {
        Self::retain(self.runtime, self.handle)
    }
}

impl Drop for Owned<'_> {
    fn drop(&mut self) {
        self.runtime.release(self.handle);
    }
}

impl fmt::Debug for Owned<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Owned").field(&self.handle).finish()
    }
}
