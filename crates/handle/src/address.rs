/// The address of a handle's managed object, for identity comparisons
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address(*const u8);

impl<T: ?Sized> From<*const T> for Address {
    fn from(pointer: *const T) -> Self {
        Self(pointer as *const u8)
    }
}
