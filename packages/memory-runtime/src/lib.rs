//! In-process reference-counted object runtime.
//!
//! `MemoryRuntime` implements the [`Runtime`](ocbridge_runtime::Runtime)
//! boundary entirely in Rust: every object lives on the heap behind a real
//! pointer, carries a type identifier and an exact retain count, and is freed
//! when its count drops to zero. Containers retain their elements and release
//! them when they are freed.
//!
//! On top of the runtime API it exposes probes for testing the bridge's
//! ownership discipline:
//!
//! - [`MemoryRuntime::live_objects`] - objects currently alive
//! - [`MemoryRuntime::allocations`] - objects created so far
//! - [`MemoryRuntime::fail_allocations_after`] - inject allocation failure
//! - [`MemoryRuntime::invalid_releases`] - releases of dead handles
//!
//! # Example
//!
//! ```rust
//! use ocbridge_memory_runtime::MemoryRuntime;
//! use ocbridge_runtime::{Owned, Runtime};
//!
//! let rt = MemoryRuntime::new();
//! let baseline = rt.live_objects();
//! {
//!     let text = Owned::adopt(&rt, rt.string_create("héllo", false).unwrap());
//!     assert_eq!(rt.live_objects(), baseline + 1);
//!     # let _ = text;
//! }
//! assert_eq!(rt.live_objects(), baseline);
//! ```

mod object;
mod runtime;

pub use runtime::MemoryRuntime;
