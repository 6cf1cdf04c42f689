//! serde support for handles, enabled with the `serde` feature
//!
//! An owning handle serializes as its managed value, and an empty handle serializes as `null`.
//! Deserializing `null` always produces an empty handle, so an owning handle whose value
//! serializes as `null` (e.g. `SharedHandle<Option<T>>` holding `None`) comes back empty.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::SharedHandle;

impl<T: ?Sized + Serialize> Serialize for SharedHandle<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SharedHandle::get(self).serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for SharedHandle<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<T>::deserialize(deserializer)?;
        Ok(value.map_or_else(SharedHandle::empty, SharedHandle::new))
    }
}
