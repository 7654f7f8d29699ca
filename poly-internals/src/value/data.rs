//! This module encapsulates the fields of the [`ValueData`]. Since this is the
//! only place they are visible, this means that the type of the vtable is
//! guaranteed to always be in sync with the type of the actual value. This
//! follows from the fact that they are checked to be in sync when created and
//! that the API offers no way to change the vtable or the value type after
//! creation.

use crate::value::{
    raw::{RawValueMut, RawValueRef},
    vtable::VtableRef,
};

/// Type-erased value storage with vtable-based dispatch.
///
/// This struct uses `#[repr(C)]` to enable safe field access in type-erased
/// contexts, allowing access to the vtable field even when the concrete value
/// type `T` is unknown.
#[repr(C)]
pub(super) struct ValueData<T: 'static> {
    /// The vtable of this value
    vtable: VtableRef,
    /// The actual value
    value: T,
}

impl<T: 'static> ValueData<T> {
    /// Pairs a value with its vtable.
    ///
    /// The caller is responsible for checking that the vtable was created for
    /// `T`; see [`RawValue::new_in`](crate::RawValue::new_in).
    #[inline]
    pub(super) fn new(vtable: VtableRef, value: T) -> Self {
        Self { vtable, value }
    }

    /// Unwraps the value, discarding the vtable.
    #[inline]
    pub(super) fn into_value(self) -> T {
        self.value
    }
}

impl<'a> RawValueRef<'a> {
    /// Returns the vtable of the [`ValueData`] instance.
    #[inline]
    pub fn vtable(self) -> VtableRef {
        let ptr = self.as_ptr();
        // SAFETY: We don't know the actual inner value type, but we do know
        // that it points to an instance of `ValueData<T>` for some specific `T`.
        // Since `ValueData<T>` is `#[repr(C)]`, that means that it's
        // safe to create pointers to the fields before the actual value.
        //
        // We need to take care to avoid creating an actual reference to
        // the `ValueData` itself though, as that would still be undefined behavior
        // since we don't have the right type.
        let vtable_ptr: *const VtableRef = unsafe { &raw const (*ptr).vtable };

        // SAFETY: Dereferencing the pointer and copying out the `VtableRef` is
        // valid for the same reasons
        unsafe { *vtable_ptr }
    }

    /// Accesses the inner value of the [`ValueData`] instance as a reference
    /// to the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the type `T` matches the actual value type
    /// stored in the [`ValueData`].
    #[inline]
    pub unsafe fn downcast_unchecked<T: 'static>(self) -> &'a T {
        // SAFETY: The inner function requires that `T` matches the type stored,
        // but that is guaranteed by our caller.
        let this = unsafe { self.cast_inner::<T>() };
        &this.value
    }
}

impl<'a> RawValueMut<'a> {
    /// Accesses the inner value of the [`ValueData`] instance as a mutable
    /// reference to the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the type `T` matches the actual value type
    /// stored in the [`ValueData`].
    #[inline]
    pub unsafe fn downcast_unchecked<T: 'static>(self) -> &'a mut T {
        // SAFETY: The inner function requires that `T` matches the type stored,
        // but that is guaranteed by our caller.
        let this = unsafe { self.cast_inner::<T>() };
        &mut this.value
    }
}
