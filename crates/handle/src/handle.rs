use std::{
    cell::Cell,
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    mem,
    ops::Deref,
    process,
    ptr::NonNull,
};

use crate::{Address, HandleError, Result};

/// Makes a SharedHandle, with support for casting to trait objects
///
/// Although `SharedHandle::new` can be used, the challenge comes when a trait object needs to be
/// used as the pointee type. Until the `CoerceUnsized` trait is stabilized, casting from a concrete
/// type to `dyn Trait` needs to be performed on the boxed value before it's handed over. This macro
/// encapsulates the casting to make life easier at the call site.
///
/// # Examples
///
/// ```
/// use shared_handle::{SharedHandle, make_handle};
/// use std::fmt::Display;
///
/// let handle: SharedHandle<dyn Display> = make_handle!(42);
///
/// assert_eq!(handle.to_string(), "42");
/// assert_eq!(SharedHandle::refs(&handle), 1);
/// ```
#[macro_export]
macro_rules! make_handle {
    ($value:expr) => {
        $crate::SharedHandle::from(::std::boxed::Box::new($value) as ::std::boxed::Box<_>)
    };
}

/// A shared-ownership handle to a value in allocated memory
///
/// Cloning a handle increments a count that's shared by every handle to the same value, and
/// dropping a handle decrements it. The value and the count are freed together when the count
/// reaches zero.
///
/// A handle is either _empty_ or _owning_. Empty handles have neither a value nor a count, and
/// every operation other than dereferencing is defined for them.
///
/// `SharedHandle` implements `Deref`, so its own operations are associated functions, e.g.
/// `SharedHandle::refs(&handle)`, to avoid clashing with methods on `T`.
pub struct SharedHandle<T: ?Sized> {
    shared: Option<Shared<T>>,
    _owned: PhantomData<T>,
}

// The managed object and its count cell, always present together
struct Shared<T: ?Sized> {
    object: NonNull<T>,
    count: NonNull<Cell<usize>>,
}

impl<T: ?Sized> Clone for Shared<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Shared<T> {}

impl<T: ?Sized> Shared<T> {
    fn new(object: Box<T>) -> Self {
        let count = Box::new(Cell::new(1));

        Self {
            object: NonNull::from(Box::leak(object)),
            count: NonNull::from(Box::leak(count)),
        }
    }

    // Safety: the cell is alive for as long as the caller holds a share of it
    fn count(&self) -> &Cell<usize> {
        unsafe { self.count.as_ref() }
    }

    fn acquire(&self) {
        let count = self.count();
        match count.get().checked_add(1) {
            Some(incremented) => count.set(incremented),
            // Only reachable by leaking usize::MAX handles
            None => process::abort(),
        }
    }

    fn release(self) {
        let count = self.count();
        let remaining = count.get() - 1;
        count.set(remaining);

        if remaining == 0 {
            // Safety: this was the last share, and both allocations came from a Box
            unsafe {
                drop(Box::from_raw(self.count.as_ptr()));
                drop(Box::from_raw(self.object.as_ptr()));
            }
        }
    }
}

impl<T: ?Sized> SharedHandle<T> {
    /// Makes a handle without a managed object
    pub const fn empty() -> Self {
        Self {
            shared: None,
            _owned: PhantomData,
        }
    }

    /// Takes ownership of a pointer that was produced by `Box::into_raw`
    ///
    /// A null pointer produces an empty handle.
    ///
    /// # Safety
    ///
    /// A non-null `object` must have been returned by `Box::into_raw`, and must not be owned by
    /// anything else.
    pub unsafe fn from_raw(object: *mut T) -> Self {
        if object.is_null() {
            Self::empty()
        } else {
            Self::from_shared(Some(Shared::new(unsafe { Box::from_raw(object) })))
        }
    }

    /// Moves the managed object and its count out of the handle, leaving it empty
    ///
    /// The count is transferred rather than incremented.
    pub fn take(this: &mut Self) -> Self {
        Self::from_shared(this.shared.take())
    }

    /// Makes `this` share `other`'s managed object
    ///
    /// The previously owned object is released, and dropped if `this` was its last owner.
    /// Assigning a handle to itself has no effect.
    pub fn assign(this: &mut Self, other: &Self) {
        let mut copy = other.clone();
        Self::swap(this, &mut copy);
    }

    /// Makes `this` take over `other`'s managed object and count
    ///
    /// The previously owned object is released, and dropped if `this` was its last owner.
    pub fn assign_move(this: &mut Self, mut other: Self) {
        Self::swap(this, &mut other);
    }

    /// Exchanges the managed objects of two handles, leaving the counts untouched
    pub fn swap(this: &mut Self, other: &mut Self) {
        mem::swap(&mut this.shared, &mut other.shared);
    }

    /// Releases the managed object, leaving the handle empty
    ///
    /// If this was the last handle to the object then the object is dropped.
    pub fn reset(this: &mut Self) {
        drop(Self::take(this));
    }

    /// Returns a reference to the managed object, or None if the handle is empty
    pub fn get(this: &Self) -> Option<&T> {
        // Safety: the object is alive while this handle holds a share of it
        this.shared
            .as_ref()
            .map(|shared| unsafe { shared.object.as_ref() })
    }

    /// Returns a reference to the managed object
    ///
    /// Returns an error if the handle is empty. Dereferencing with `*` or `.` performs the same
    /// check, and panics with the error.
    pub fn try_deref(this: &Self) -> Result<&T> {
        Self::get(this).ok_or(HandleError::Empty)
    }

    /// Returns a mutable reference to the managed object if this is its only handle
    pub fn get_mut(this: &mut Self) -> Option<&mut T> {
        match &mut this.shared {
            // Safety: no other handle can observe the object
            Some(shared) if shared.count().get() == 1 => {
                Some(unsafe { shared.object.as_mut() })
            }
            _ => None,
        }
    }

    /// Returns the number of handles that share the managed object
    ///
    /// Empty handles return 0.
    pub fn refs(this: &Self) -> usize {
        this.shared
            .as_ref()
            .map_or(0, |shared| shared.count().get())
    }

    /// Returns true if the handle has no managed object
    pub fn is_empty(this: &Self) -> bool {
        this.shared.is_none()
    }

    /// Returns true if the two handles share the same managed object, or are both empty
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        match (&this.shared, &other.shared) {
            (Some(a), Some(b)) => a.count == b.count,
            (None, None) => true,
            _ => false,
        }
    }

    /// Returns the address of the managed object, or None if the handle is empty
    pub fn address(this: &Self) -> Option<Address> {
        Self::get(this).map(|object| Address::from(object as *const T))
    }

    fn from_shared(shared: Option<Shared<T>>) -> Self {
        Self {
            shared,
            _owned: PhantomData,
        }
    }
}

impl<T> SharedHandle<T> {
    /// Moves the provided value into newly allocated memory
    pub fn new(value: T) -> Self {
        Self::from_shared(Some(Shared::new(Box::new(value))))
    }

    /// Makes a handle from the result of a fallible constructor
    ///
    /// Nothing is allocated when the constructor fails, and its error is returned unchanged.
    pub fn try_new_with<E, F>(f: F) -> std::result::Result<Self, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
    {
        f().map(Self::new)
    }

    /// Returns the managed object if this is its only handle
    ///
    /// Otherwise the handle is returned unchanged as the error, including when it's empty.
    pub fn try_unwrap(mut this: Self) -> std::result::Result<T, Self> {
        match this.shared.take() {
            // Safety: this was the only share, and both allocations came from a Box
            Some(shared) if shared.count().get() == 1 => unsafe {
                drop(Box::from_raw(shared.count.as_ptr()));
                Ok(*Box::from_raw(shared.object.as_ptr()))
            },
            shared => {
                this.shared = shared;
                Err(this)
            }
        }
    }

    /// Returns the managed object if this is its only handle, otherwise None
    ///
    /// If other handles share the object then the handle is released.
    pub fn into_inner(this: Self) -> Option<T> {
        Self::try_unwrap(this).ok()
    }
}

impl<T: Clone> SharedHandle<T> {
    /// Makes a mutable reference into the managed object
    ///
    /// If the handle is the object's only owner, then the reference will be returned.
    /// Otherwise the handle is detached onto a clone of the object before returning the reference,
    /// and the other handles keep sharing the original.
    ///
    /// Returns an error if the handle is empty.
    pub fn make_mut(this: &mut Self) -> Result<&mut T> {
        if Self::refs(this) > 1 {
            let detached = Self::new(Self::try_deref(this)?.clone());
            Self::assign_move(this, detached);
        }

        Self::get_mut(this).ok_or(HandleError::Empty)
    }
}

impl<T: ?Sized> Drop for SharedHandle<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            shared.release();
        }
    }
}

impl<T: ?Sized> Default for SharedHandle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> Clone for SharedHandle<T> {
    fn clone(&self) -> Self {
        if let Some(shared) = &self.shared {
            shared.acquire();
        }
        Self::from_shared(self.shared)
    }

    fn clone_from(&mut self, source: &Self) {
        Self::assign(self, source);
    }
}

impl<T: ?Sized> Deref for SharedHandle<T> {
    type Target = T;

    #[track_caller]
    fn deref(&self) -> &T {
        match Self::try_deref(self) {
            Ok(object) => object,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T> From<T> for SharedHandle<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: ?Sized> From<Box<T>> for SharedHandle<T> {
    fn from(boxed: Box<T>) -> Self {
        Self::from_shared(Some(Shared::new(boxed)))
    }
}

impl<T: Clone> From<&[T]> for SharedHandle<[T]> {
    #[inline]
    fn from(value: &[T]) -> Self {
        Self::from(Box::<[T]>::from(value))
    }
}

impl<T> From<Vec<T>> for SharedHandle<[T]> {
    #[inline]
    fn from(value: Vec<T>) -> Self {
        Self::from(value.into_boxed_slice())
    }
}

impl From<&str> for SharedHandle<str> {
    #[inline]
    fn from(value: &str) -> Self {
        Self::from(Box::<str>::from(value))
    }
}

impl From<String> for SharedHandle<str> {
    #[inline]
    fn from(value: String) -> Self {
        Self::from(value.into_boxed_str())
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for SharedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedHandle")
            .field(&Self::get(self))
            .finish()
    }
}

impl<T: ?Sized + fmt::Display> fmt::Display for SharedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Self::get(self) {
            Some(object) => object.fmt(f),
            None => f.write_str("null"),
        }
    }
}

impl<T: ?Sized + PartialEq> PartialEq for SharedHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        Self::get(self) == Self::get(other)
    }
}

impl<T: ?Sized + Eq> Eq for SharedHandle<T> {}

impl<T: ?Sized + Hash> Hash for SharedHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Self::get(self).hash(state)
    }
}

impl<T: ?Sized + Ord> Ord for SharedHandle<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        Self::get(self).cmp(&Self::get(other))
    }
}

impl<T: ?Sized + PartialOrd> PartialOrd for SharedHandle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Self::get(self).partial_cmp(&Self::get(other))
    }
}
