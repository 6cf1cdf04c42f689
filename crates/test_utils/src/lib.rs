//! Testing utilities for the shared_handle crate

#![warn(missing_docs)]

mod drop_probe;
mod handle_helpers;

pub use drop_probe::{DropProbe, Tracked};
pub use handle_helpers::assert_shared;
