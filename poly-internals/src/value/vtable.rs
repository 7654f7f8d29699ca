//! Vtables for type-erased values.
//!
//! This module contains the [`Vtable`] which enables copying, dropping and
//! identifying values whose concrete type `T` has been erased, and which
//! carries the caller-defined slot tuple used for everything else.
//!
//! This module encapsulates the fields of [`Vtable`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **the header function pointers of a vtable were instantiated
//! with the same `T` whose [`TypeId`] the vtable reports**. The slots are
//! supplied by the caller of the `unsafe` constructor [`Vtable::new`], who
//! vouches that they fit that `T` as well.
//!
//! # Layout
//!
//! [`Vtable`] is `#[repr(C)]` and keeps the slot tuple as its last field. The
//! header fields therefore have the same offsets for every slot type `S`,
//! which is what allows [`VtableRef`] to read the header of a vtable without
//! knowing `S`.

use alloc::boxed::Box;
use core::{any::TypeId, ptr::NonNull};

use crate::{
    util::Erased,
    value::{
        data::ValueData,
        raw::{RawValue, RawValueRef},
    },
};

/// Dispatch table for one concrete type `T`, carrying the slots `S`.
///
/// # Safety Invariant
///
/// The fields `type_id`, `type_name`, `drop` and `clone` are guaranteed to
/// point to the functions defined below instantiated with the type `T` that
/// was used to create this [`Vtable`], and that every function in the slots
/// is sound to call with values of that same `T`.
#[repr(C)]
pub struct Vtable<S: 'static> {
    /// Gets the [`TypeId`] of the type that was used to create this
    /// [`Vtable`].
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the type that was used to create
    /// this [`Vtable`].
    type_name: fn() -> &'static str,
    /// Drops the [`Box<ValueData<T>>`] instance pointed to by this pointer.
    drop: unsafe fn(NonNull<ValueData<Erased>>),
    /// Deep-copies the value into a fresh allocation sharing this vtable.
    clone: unsafe fn(RawValueRef<'_>) -> RawValue,
    /// Caller-defined dispatch slots.
    slots: S,
}

impl<S: 'static> Vtable<S> {
    /// Creates a new [`Vtable`] for the type `T` with the given slots.
    ///
    /// This is a `const fn` so that vtables can be created in constant
    /// context and promoted to `&'static` references.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. Every function in `slots` that receives an erased value is sound to
    ///    call with a value of type `T`, and only relies on the value being a
    ///    `T`.
    ///
    /// Slot functions typically recover the value with `downcast_unchecked`,
    /// so a vtable whose slots were instantiated for another type would read
    /// the value as the wrong type.
    ///
    /// Creating a vtable is therefore not possible in safe code:
    ///
    /// ```compile_fail
    /// use poly_internals::Vtable;
    ///
    /// static VTABLE: Vtable<()> = Vtable::new::<u8>(());
    /// ```
    #[inline]
    pub const unsafe fn new<T: Clone + 'static>(slots: S) -> Self {
        Self {
            type_id: TypeId::of::<T>,
            type_name: core::any::type_name::<T>,
            drop: drop::<T>,
            clone: clone::<T>,
            slots,
        }
    }

    /// Gets the [`TypeId`] of the type that was used to create this
    /// [`Vtable`].
    #[inline]
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the [`core::any::type_name`] of the type that was used to create
    /// this [`Vtable`].
    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Returns the slots of this [`Vtable`].
    #[inline]
    pub fn slots(&self) -> &S {
        &self.slots
    }
}

/// An untyped handle to a `&'static` [`Vtable`].
///
/// The header of the vtable can be read through this handle. The slots can
/// only be reached by naming their type again with [`VtableRef::typed`].
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct VtableRef {
    /// Pointer to a `Vtable<S>` for some `S`.
    ///
    /// # Safety
    ///
    /// The pointer was created from a `&'static Vtable<S>` and therefore has
    /// provenance over the whole vtable, not only over its header.
    ptr: NonNull<Vtable<Erased>>,
}

impl VtableRef {
    /// Creates an untyped handle to the given vtable.
    #[inline]
    pub fn new<S: 'static>(vtable: &'static Vtable<S>) -> Self {
        Self {
            ptr: NonNull::from(vtable).cast::<Vtable<Erased>>(),
        }
    }

    /// Returns the header of the vtable.
    #[inline]
    fn header(self) -> &'static Vtable<Erased> {
        // SAFETY:
        // 1. The pointer comes from a `&'static Vtable<S>`, so it is non-null,
        //    aligned for `Vtable<Erased>` (whose alignment is at most that of
        //    `Vtable<S>`) and valid forever.
        // 2. `Vtable` is `#[repr(C)]` with the slots last, and `Erased` is a
        //    zero-sized type, so every byte of a `Vtable<Erased>` is a header byte
        //    with the same offset and type as in the `Vtable<S>`.
        unsafe { self.ptr.as_ref() }
    }

    /// Gets the [`TypeId`] of the type that was used to create the vtable.
    #[inline]
    pub fn type_id(self) -> TypeId {
        self.header().type_id()
    }

    /// Gets the [`core::any::type_name`] of the type that was used to create
    /// the vtable.
    #[inline]
    pub fn type_name(self) -> &'static str {
        self.header().type_name()
    }

    /// Recovers the typed vtable.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This handle was created from a `&'static Vtable<S>` with exactly this
    ///    `S`.
    #[inline]
    pub unsafe fn typed<S: 'static>(self) -> &'static Vtable<S> {
        let ptr = self.ptr.cast::<Vtable<S>>();
        // SAFETY: The handle was created from a `&'static Vtable<S>` (guaranteed
        // by the caller) and the pointer carries the provenance of that reference.
        unsafe { ptr.as_ref() }
    }

    /// Drops the [`Box<ValueData<T>>`] instance pointed to by this pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from [`Box<ValueData<T>>`] via [`Box::into_raw`]
    /// 2. This vtable was created for the `T` stored behind the pointer
    /// 3. This method drops the [`Box<ValueData<T>>`], so the caller must
    ///    ensure that the pointer has not previously been dropped, that it is
    ///    able to transfer ownership of the pointer, and that it will not use
    ///    the pointer after calling this method.
    #[inline]
    pub(super) unsafe fn drop(self, ptr: NonNull<ValueData<Erased>>) {
        let header = self.header();
        // SAFETY: We know that `header.drop` points to the function `drop::<T>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe {
            (header.drop)(ptr);
        }
    }

    /// Deep-copies the value behind `value` into a new [`RawValue`] that uses
    /// this vtable.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This vtable was created for the `T` stored behind `value`
    #[inline]
    pub(super) unsafe fn clone(self, value: RawValueRef<'_>) -> RawValue {
        let header = self.header();
        // SAFETY: We know that `header.clone` points to the function `clone::<T>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (header.clone)(value) }
    }
}

impl core::fmt::Debug for VtableRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VtableRef")
            .field("type_name", &self.type_name())
            .finish_non_exhaustive()
    }
}

/// Drops the [`Box<ValueData<T>>`] instance pointed to by this pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`Box<ValueData<T>>`] via [`Box::into_raw`]
/// 2. The `T` matches the actual value type stored in the [`ValueData`]
/// 3. This method drops the [`Box<ValueData<T>>`], so the caller must ensure
///    that the pointer has not previously been dropped, that it is able to
///    transfer ownership of the pointer, and that it will not use the pointer
///    after calling this method.
unsafe fn drop<T: 'static>(ptr: NonNull<ValueData<Erased>>) {
    let ptr: NonNull<ValueData<T>> = ptr.cast::<ValueData<T>>();
    let ptr = ptr.as_ptr();
    // SAFETY: Our pointer has the correct type as guaranteed by the caller, and
    // it came from a call to `Box::into_raw` as also guaranteed by our caller.
    let boxed = unsafe {
        // @add-unsafe-context: ValueData
        Box::from_raw(ptr)
    };
    core::mem::drop(boxed);
}

/// Deep-copies the value behind `value` into a new allocation that points at
/// the same vtable.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `T` matches the actual value type stored behind `value`
unsafe fn clone<T: Clone + 'static>(value: RawValueRef<'_>) -> RawValue {
    let vtable = value.vtable();
    // SAFETY: The type `T` matches the stored value (guaranteed by the caller)
    let value: &T = unsafe { value.downcast_unchecked::<T>() };
    RawValue::new_in(value.clone(), vtable)
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    #[test]
    fn test_vtable_header_reports_type() {
        // SAFETY: There are no slots
        let vtable: Vtable<()> = unsafe { Vtable::new::<String>(()) };
        assert_eq!(vtable.type_id(), TypeId::of::<String>());
        assert_eq!(vtable.type_name(), core::any::type_name::<String>());
    }

    #[test]
    fn test_vtable_ref_reads_header_for_any_slots() {
        // SAFETY: There are no slots
        static SMALL: Vtable<()> = unsafe { Vtable::new::<u8>(()) };
        // SAFETY: None of the slots receives an erased value
        static LARGE: Vtable<(u64, [u128; 3], fn() -> u8)> =
            unsafe { Vtable::new::<String>((7, [1, 2, 3], || 9)) };

        let small = VtableRef::new(&SMALL);
        let large = VtableRef::new(&LARGE);

        assert_eq!(small.type_id(), TypeId::of::<u8>());
        assert_eq!(large.type_id(), TypeId::of::<String>());
        assert_eq!(large.type_name(), core::any::type_name::<String>());
        assert_ne!(small, large);

        // SAFETY: `large` was created from a `Vtable` with exactly these slots
        let typed = unsafe { large.typed::<(u64, [u128; 3], fn() -> u8)>() };
        assert_eq!(typed.slots().0, 7);
        assert_eq!(typed.slots().1, [1, 2, 3]);
        assert_eq!((typed.slots().2)(), 9);
        assert!(core::ptr::eq(typed, &LARGE));
    }

    #[test]
    fn test_vtable_header_offsets() {
        use core::mem::{offset_of, size_of};

        let header = 4 * size_of::<fn()>();
        assert_eq!(offset_of!(Vtable<()>, type_id), 0);
        assert_eq!(offset_of!(Vtable<u8>, type_id), 0);
        assert_eq!(
            offset_of!(Vtable<[u128; 2]>, clone),
            offset_of!(Vtable<Erased>, clone)
        );
        assert_eq!(offset_of!(Vtable<(u8, u16)>, slots), header);
        assert_eq!(size_of::<Vtable<Erased>>(), header);
    }
}
