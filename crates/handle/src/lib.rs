//! A reference-counted, shared-ownership handle
//!
//! [`SharedHandle`] lets several owners share a single heap-allocated value. The value is dropped
//! exactly once, when the last owning handle is dropped or reset. Unlike `Rc`, a handle can also be
//! _empty_, owning nothing, which is the state a handle is left in after being reset or moved
//! out of with [`SharedHandle::take`].
//!
//! Handles use a plain, non-atomic count and are neither `Send` nor `Sync`:
//!
//! ```compile_fail
//! fn assert_send<T: Send>() {}
//!
//! assert_send::<shared_handle::SharedHandle<i64>>();
//! ```

#![warn(missing_docs)]

mod address;
mod error;
mod handle;
#[cfg(feature = "serde")]
mod serialize;

pub use crate::{
    address::Address,
    error::{HandleError, Result},
    handle::SharedHandle,
};
