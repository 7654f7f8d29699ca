//! Shared storage with copy-on-write semantics.
//!
//! [`CopyOnWrite<T>`] is an optional storage mode for values that are
//! expensive to copy: cloning only bumps a reference count, and the first
//! mutation through a shared handle copies the value so that no other handle
//! observes it. Semantically every handle behaves like an independent value.
//!
//! The sharing primitive follows the thread-safety marker: `SendSync` handles
//! use an atomic [`triomphe::Arc`], `Local` handles use an
//! [`Rc`](alloc::rc::Rc).
//!
//! # Examples
//!
//! ```
//! use poly::cow::CopyOnWrite;
//!
//! let original = CopyOnWrite::<Vec<u32>>::new(vec![1, 2, 3]);
//! let mut copy = original.clone();
//! assert!(copy.ptr_eq(&original));
//!
//! copy.write().push(4);
//! assert!(!copy.ptr_eq(&original));
//! assert_eq!(*original, [1, 2, 3]);
//! assert_eq!(*copy, [1, 2, 3, 4]);
//! ```

use core::ops::Deref;

use alloc::rc::Rc;

use crate::markers::{Local, SendSync};

mod sealed {
    pub trait Sealed {}

    impl Sealed for crate::markers::SendSync {}
    impl Sealed for crate::markers::Local {}
}

/// The sharing primitive used by [`CopyOnWrite`] for a thread-safety marker.
///
/// Sealed; implemented for [`SendSync`] and [`Local`].
pub trait SharingMarker: sealed::Sealed + 'static {
    /// The reference-counted pointer type.
    #[doc(hidden)]
    type Shared<T: Clone + 'static>: Clone + Deref<Target = T>;

    #[doc(hidden)]
    fn share<T: Clone + 'static>(value: T) -> Self::Shared<T>;

    #[doc(hidden)]
    fn make_mut<T: Clone + 'static>(shared: &mut Self::Shared<T>) -> &mut T;

    #[doc(hidden)]
    fn use_count<T: Clone + 'static>(shared: &Self::Shared<T>) -> usize;

    #[doc(hidden)]
    fn ptr_eq<T: Clone + 'static>(a: &Self::Shared<T>, b: &Self::Shared<T>) -> bool;

    #[doc(hidden)]
    fn unwrap_or_clone<T: Clone + 'static>(shared: Self::Shared<T>) -> T;
}

impl SharingMarker for SendSync {
    type Shared<T: Clone + 'static> = triomphe::Arc<T>;

    #[inline]
    fn share<T: Clone + 'static>(value: T) -> Self::Shared<T> {
        triomphe::Arc::new(value)
    }

    #[inline]
    fn make_mut<T: Clone + 'static>(shared: &mut Self::Shared<T>) -> &mut T {
        triomphe::Arc::make_mut(shared)
    }

    #[inline]
    fn use_count<T: Clone + 'static>(shared: &Self::Shared<T>) -> usize {
        triomphe::ArcBorrow::strong_count(&shared.borrow_arc())
    }

    #[inline]
    fn ptr_eq<T: Clone + 'static>(a: &Self::Shared<T>, b: &Self::Shared<T>) -> bool {
        triomphe::Arc::ptr_eq(a, b)
    }

    #[inline]
    fn unwrap_or_clone<T: Clone + 'static>(shared: Self::Shared<T>) -> T {
        triomphe::Arc::try_unwrap(shared).unwrap_or_else(|shared| T::clone(&shared))
    }
}

impl SharingMarker for Local {
    type Shared<T: Clone + 'static> = Rc<T>;

    #[inline]
    fn share<T: Clone + 'static>(value: T) -> Self::Shared<T> {
        Rc::new(value)
    }

    #[inline]
    fn make_mut<T: Clone + 'static>(shared: &mut Self::Shared<T>) -> &mut T {
        Rc::make_mut(shared)
    }

    #[inline]
    fn use_count<T: Clone + 'static>(shared: &Self::Shared<T>) -> usize {
        Rc::strong_count(shared)
    }

    #[inline]
    fn ptr_eq<T: Clone + 'static>(a: &Self::Shared<T>, b: &Self::Shared<T>) -> bool {
        Rc::ptr_eq(a, b)
    }

    #[inline]
    fn unwrap_or_clone<T: Clone + 'static>(shared: Self::Shared<T>) -> T {
        Rc::unwrap_or_clone(shared)
    }
}

/// A value stored behind a shared pointer and copied on first mutation.
///
/// Use it as the concrete type held by an interface to make copies of the
/// interface value cheap:
///
/// ```
/// use poly::{cow::CopyOnWrite, prelude::*};
///
/// callable! {
///     pub struct Total;
/// }
///
/// impl<'a> Call<(&'a CopyOnWrite<Vec<u64>>,)> for Total {
///     type Output = u64;
///     fn call(self, (values,): (&'a CopyOnWrite<Vec<u64>>,)) -> u64 {
///         values.iter().sum()
///     }
/// }
///
/// interface! {
///     pub struct Summable: SummableModel + Send + Sync {
///         fn total = Total(self: &Self) -> u64;
///     }
/// }
///
/// let values = CopyOnWrite::new((1..=100).collect::<Vec<u64>>());
/// let first = Summable::new(values);
/// let second = first.clone();
/// assert_eq!(second.total(), 5050);
///
/// let shared = first.cast::<CopyOnWrite<Vec<u64>>>().unwrap();
/// assert_eq!(shared.use_count(), 2);
/// ```
pub struct CopyOnWrite<T: Clone + 'static, Th: SharingMarker = SendSync> {
    shared: Th::Shared<T>,
}

impl<T: Clone + 'static, Th: SharingMarker> CopyOnWrite<T, Th> {
    /// Stores `value` as the sole owner.
    #[inline]
    pub fn new(value: T) -> Self {
        Self {
            shared: Th::share(value),
        }
    }

    /// Returns the value.
    #[inline]
    pub fn read(&self) -> &T {
        &self.shared
    }

    /// Returns the value for mutation, copying it first if any other handle
    /// shares it.
    pub fn write(&mut self) -> &mut T {
        if !self.is_unique() {
            tracing::trace!(
                value = core::any::type_name::<T>(),
                use_count = self.use_count(),
                "copying shared value before write"
            );
        }
        Th::make_mut(&mut self.shared)
    }

    /// Returns the number of handles sharing the value.
    #[inline]
    pub fn use_count(&self) -> usize {
        Th::use_count(&self.shared)
    }

    /// Returns `true` if this is the only handle to the value.
    #[inline]
    pub fn is_unique(&self) -> bool {
        self.use_count() == 1
    }

    /// Returns `true` if both handles share the same storage.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Th::ptr_eq(&self.shared, &other.shared)
    }

    /// Unwraps the value, copying it if it is shared.
    #[inline]
    pub fn into_inner(self) -> T {
        Th::unwrap_or_clone(self.shared)
    }
}

impl<T: Clone + 'static, Th: SharingMarker> Deref for CopyOnWrite<T, Th> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        self.read()
    }
}

impl<T: Clone + 'static, Th: SharingMarker> Clone for CopyOnWrite<T, Th> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static, Th: SharingMarker> PartialEq for CopyOnWrite<T, Th> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.read() == other.read()
    }
}

impl<T: Clone + Eq + 'static, Th: SharingMarker> Eq for CopyOnWrite<T, Th> {}

impl<T: Clone + Default + 'static, Th: SharingMarker> Default for CopyOnWrite<T, Th> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static, Th: SharingMarker> From<T> for CopyOnWrite<T, Th> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Clone + core::fmt::Debug + 'static, Th: SharingMarker> core::fmt::Debug
    for CopyOnWrite<T, Th>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CopyOnWrite")
            .field("value", self.read())
            .field("use_count", &self.use_count())
            .finish()
    }
}
