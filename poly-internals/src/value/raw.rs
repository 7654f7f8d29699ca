//! Type-erased value pointer types.
//!
//! This module encapsulates the `ptr` field of [`RawValue`], [`RawValueRef`]
//! and [`RawValueMut`], ensuring it is only visible within this module. This
//! visibility restriction guarantees the safety invariant: **the pointer
//! always comes from `Box<ValueData<T>>`, and the vtable stored inside was
//! created for that same `T`**.
//!
//! # Safety Invariant
//!
//! Since the `ptr` field can only be set via [`RawValue::new_in`] (which
//! checks the vtable against `T` and creates the pointer from
//! `Box::into_raw`), and cannot be modified afterward, the pointer provenance
//! remains valid throughout the value's lifetime.
//!
//! The [`RawValue::drop`] implementation relies on this invariant to safely
//! reconstruct the `Box` and deallocate the memory.

use alloc::boxed::Box;
use core::{any::TypeId, marker::PhantomData, mem::ManuallyDrop, ptr::NonNull};

use crate::{
    util::Erased,
    value::{
        data::ValueData,
        vtable::{Vtable, VtableRef},
    },
};

/// A pointer to a [`ValueData`] that is guaranteed to point to an initialized
/// instance of a [`ValueData<T>`] for some specific `T`, though we do not
/// know which actual `T` it is.
///
/// However, the pointer is allowed to transition into a non-initialized state
/// inside the [`RawValue::drop`] method.
///
/// The pointer is guaranteed to have been created using [`Box::into_raw`].
///
/// We cannot use a [`Box<ValueData<T>>`] directly, because that does not
/// allow us to type-erase the `T`.
#[repr(transparent)]
pub struct RawValue {
    /// Pointer to the inner value data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<ValueData<T>>` for
    ///    some `T` using `Box::into_raw`.
    /// 2. The vtable stored in the `ValueData<T>` was created for that `T`.
    /// 3. The pointer will point to the same `ValueData<T>` for the entire
    ///    lifetime of this object.
    /// 4. The pointee is properly initialized for the entire lifetime of this
    ///    object, except during the execution of the `Drop` implementation.
    ptr: NonNull<ValueData<Erased>>,
}

impl RawValue {
    /// Creates a new [`RawValue`] storing `value` next to `vtable`.
    ///
    /// # Panics
    ///
    /// Panics if `vtable` was created for a type other than `T`.
    #[inline]
    #[track_caller]
    pub fn new<T: 'static, S: 'static>(value: T, vtable: &'static Vtable<S>) -> Self {
        Self::new_in(value, VtableRef::new(vtable))
    }

    /// Creates a new [`RawValue`] storing `value` next to an already erased
    /// vtable, typically the vtable of another value of the same type.
    ///
    /// # Panics
    ///
    /// Panics if `vtable` was created for a type other than `T`.
    #[inline]
    #[track_caller]
    pub fn new_in<T: 'static>(value: T, vtable: VtableRef) -> Self {
        assert!(
            vtable.type_id() == TypeId::of::<T>(),
            "a vtable created for `{}` cannot store a value of type `{}`",
            vtable.type_name(),
            core::any::type_name::<T>(),
        );

        let ptr = Box::new(ValueData::new(vtable, value));
        let ptr: *mut ValueData<T> = Box::into_raw(ptr);
        let ptr: *mut ValueData<Erased> = ptr.cast::<ValueData<Erased>>();

        // SAFETY: `Box::into_raw` returns a non-null pointer
        let ptr: NonNull<ValueData<Erased>> = unsafe {
            // @add-unsafe-context: Erased
            NonNull::new_unchecked(ptr)
        };

        Self { ptr }
    }

    /// Returns a reference to the [`ValueData`] instance.
    #[inline]
    pub fn as_ref(&self) -> RawValueRef<'_> {
        RawValueRef {
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }

    /// Returns a mutable reference to the [`ValueData`] instance.
    #[inline]
    pub fn as_mut(&mut self) -> RawValueMut<'_> {
        RawValueMut {
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }

    /// Returns the vtable of the stored value.
    #[inline]
    pub fn vtable(&self) -> VtableRef {
        self.as_ref().vtable()
    }

    /// Moves the stored value out, releasing the allocation.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `T` matches the actual value type stored in the
    ///    [`ValueData`].
    #[inline]
    pub unsafe fn into_value_unchecked<T: 'static>(self) -> T {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.as_ref().type_id(), TypeId::of::<T>());

        let this = ManuallyDrop::new(self);
        let ptr: *mut ValueData<T> = this.ptr.cast::<ValueData<T>>().as_ptr();

        // SAFETY:
        // 1. The pointer comes from `Box::into_raw` (guaranteed by
        //    `RawValue::new_in`)
        // 2. The type `T` matches the stored value (guaranteed by the caller)
        // 3. `this` is never dropped, so ownership of the allocation moves into the
        //    reconstructed `Box` exactly once
        let boxed: Box<ValueData<T>> = unsafe { Box::from_raw(ptr) };
        boxed.into_value()
    }

    /// Attempts to move the stored value out as a `T`.
    ///
    /// Returns `Err(self)` unchanged if the stored value is not a `T`.
    #[inline]
    pub fn try_into_value<T: 'static>(self) -> Result<T, Self> {
        if self.as_ref().type_id() == TypeId::of::<T>() {
            // SAFETY: We just checked that the stored type is `T`
            let value = unsafe { self.into_value_unchecked::<T>() };
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl core::ops::Drop for RawValue {
    #[inline]
    fn drop(&mut self) {
        let vtable = self.as_ref().vtable();

        // SAFETY:
        // 1. The pointer comes from `Box::into_raw` (guaranteed by
        //    `RawValue::new_in`)
        // 2. The vtable returned by `self.as_ref().vtable()` is guaranteed to match
        //    the data in the `ValueData`.
        // 3. The pointer is initialized and has not been previously freed as
        //    guaranteed by the invariants on this type. We are correctly
        //    transferring ownership here and the pointer is not used afterwards, as
        //    we are in the drop function.
        unsafe {
            // @add-unsafe-context: ValueData
            vtable.drop(self.ptr);
        }
    }
}

impl core::fmt::Debug for RawValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.as_ref(), f)
    }
}

/// A lifetime-bound pointer to a [`ValueData`] that is guaranteed to point to
/// an initialized instance of a [`ValueData<T>`] for some specific `T`,
/// though we do not know which actual `T` it is.
///
/// We cannot use a [`&'a ValueData<T>`] directly, because that would require
/// us to know the actual type of the value, which we do not.
///
/// [`&'a ValueData<T>`]: ValueData
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct RawValueRef<'a> {
    /// Pointer to the inner value data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<ValueData<T>>` for
    ///    some `T` using `Box::into_raw`.
    /// 2. The pointer will point to the same `ValueData<T>` for the entire
    ///    lifetime of this object.
    ptr: NonNull<ValueData<Erased>>,

    /// Marker to tell the compiler that we should
    /// behave the same as a `&'a ValueData<Erased>`
    _marker: PhantomData<&'a ValueData<Erased>>,
}

impl<'a> RawValueRef<'a> {
    /// Casts the [`RawValueRef`] to a [`ValueData<T>`] reference.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `T` matches the actual value type stored in the
    ///    [`ValueData`].
    #[inline]
    pub(super) unsafe fn cast_inner<T: 'static>(self) -> &'a ValueData<T> {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.vtable().type_id(), TypeId::of::<T>());

        let this = self.ptr.cast::<ValueData<T>>();
        // SAFETY: Converting the NonNull pointer to a reference is sound because:
        // - The pointer is non-null, properly aligned, and dereferenceable (guaranteed
        //   by RawValueRef's type invariants)
        // - The pointee is properly initialized (RawValueRef's doc comment guarantees
        //   it points to an initialized ValueData<T> for some T)
        // - The type `T` matches the actual value type (guaranteed by caller)
        // - Shared access is allowed
        // - The reference lifetime 'a is valid (tied to RawValueRef<'a>'s lifetime)
        unsafe { this.as_ref() }
    }

    /// Returns a raw pointer to the [`ValueData`] instance.
    #[inline]
    pub(super) fn as_ptr(self) -> *const ValueData<Erased> {
        self.ptr.as_ptr()
    }

    /// Returns the [`TypeId`] of the stored value.
    #[inline]
    pub fn type_id(self) -> TypeId {
        self.vtable().type_id()
    }

    /// Returns the [`core::any::type_name`] of the stored value.
    #[inline]
    pub fn type_name(self) -> &'static str {
        self.vtable().type_name()
    }

    /// Returns a reference to the stored value if it is a `T`.
    #[inline]
    pub fn downcast<T: 'static>(self) -> Option<&'a T> {
        if self.type_id() == TypeId::of::<T>() {
            // SAFETY: We just checked that the stored type is `T`
            Some(unsafe { self.downcast_unchecked::<T>() })
        } else {
            None
        }
    }

    /// Deep-copies the stored value into a new [`RawValue`] that shares this
    /// value's vtable.
    #[inline]
    pub fn clone_value(self) -> RawValue {
        let vtable = self.vtable();
        // SAFETY:
        // 1. The vtable returned by `self.vtable()` is guaranteed to match the data in
        //    the `ValueData`.
        unsafe {
            // @add-unsafe-context: ValueData
            vtable.clone(self)
        }
    }
}

impl core::fmt::Debug for RawValueRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawValue")
            .field("type_name", &self.type_name())
            .finish_non_exhaustive()
    }
}

/// A mutable lifetime-bound pointer to a [`ValueData`] that is guaranteed to
/// point to an initialized instance of a [`ValueData<T>`] for some specific
/// `T`, though we do not know which actual `T` it is.
///
/// We cannot use a [`&'a mut ValueData<T>`] directly, because that would
/// require us to know the actual type of the value, which we do not.
///
/// [`&'a mut ValueData<T>`]: ValueData
#[repr(transparent)]
pub struct RawValueMut<'a> {
    /// Pointer to the inner value data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<ValueData<T>>` for
    ///    some `T` using `Box::into_raw`.
    /// 2. The pointer will point to the same `ValueData<T>` for the entire
    ///    lifetime of this object.
    /// 3. This handle is the only way to reach the pointee for `'a`.
    ptr: NonNull<ValueData<Erased>>,

    /// Marker to tell the compiler that we should
    /// behave the same as a `&'a mut ValueData<Erased>`
    _marker: PhantomData<&'a mut ValueData<Erased>>,
}

impl<'a> RawValueMut<'a> {
    /// Casts the [`RawValueMut`] to a mutable [`ValueData<T>`] reference.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `T` matches the actual value type stored in the
    ///    [`ValueData`].
    #[inline]
    pub(super) unsafe fn cast_inner<T: 'static>(self) -> &'a mut ValueData<T> {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.as_ref().type_id(), TypeId::of::<T>());

        let mut this = self.ptr.cast::<ValueData<T>>();
        // SAFETY: Converting the NonNull pointer to a mutable reference is sound
        // because:
        // - The pointer is non-null, properly aligned, and dereferenceable (guaranteed
        //   by RawValueMut's type invariants)
        // - The pointee is properly initialized and of type `T` (guaranteed by the
        //   type invariants and the caller)
        // - Access is exclusive for 'a, since `self` was the only handle and it is
        //   consumed here
        unsafe { this.as_mut() }
    }

    /// Returns a shared reference to the [`ValueData`] instance.
    #[inline]
    pub fn as_ref(&self) -> RawValueRef<'_> {
        RawValueRef {
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }

    /// Reborrows the mutable reference for a shorter lifetime.
    #[inline]
    pub fn reborrow(&mut self) -> RawValueMut<'_> {
        RawValueMut {
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }

    /// Converts this mutable reference into a shared reference with the same
    /// lifetime.
    #[inline]
    pub fn into_ref(self) -> RawValueRef<'a> {
        RawValueRef {
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }

    /// Returns the vtable of the stored value.
    #[inline]
    pub fn vtable(&self) -> VtableRef {
        self.as_ref().vtable()
    }

    /// Returns a mutable reference to the stored value if it is a `T`.
    #[inline]
    pub fn downcast<T: 'static>(self) -> Option<&'a mut T> {
        if self.as_ref().type_id() == TypeId::of::<T>() {
            // SAFETY: We just checked that the stored type is `T`
            Some(unsafe { self.downcast_unchecked::<T>() })
        } else {
            None
        }
    }
}
