//! Integration tests for the poly-internals crate.
//!
//! These tests build small dispatch tables by hand, the same way the `poly`
//! crate's `interface!` macro does, and drive them through the raw handles:
//!
//! - `test_slots_dispatch_to_the_stored_type`: slot functions recover the
//!   concrete type from the erased handle
//! - `test_mutating_slot`: a slot taking a mutable handle
//! - `test_consuming_slot_rewraps_with_same_vtable`: a slot that consumes
//!   its value and produces a new one sharing the vtable
//! - `test_clone_and_drop_accounting`: deep copies are independent and every
//!   value is dropped exactly once

use std::{cell::Cell, fmt::Debug, rc::Rc};

use poly_internals::{RawValue, RawValueMut, RawValueRef, Vtable, VtableRef};

type Slots = (
    unsafe fn(RawValueRef<'_>) -> String,
    unsafe fn(RawValueMut<'_>),
    unsafe fn(RawValue) -> RawValue,
);

/// # Safety
///
/// `value` must hold a `T`.
unsafe fn describe<T: Debug + 'static>(value: RawValueRef<'_>) -> String {
    // SAFETY: guaranteed by the caller
    let value = unsafe { value.downcast_unchecked::<T>() };
    format!("{value:?}")
}

/// # Safety
///
/// `value` must hold a `T`.
unsafe fn reset<T: Default + 'static>(value: RawValueMut<'_>) {
    // SAFETY: guaranteed by the caller
    let value = unsafe { value.downcast_unchecked::<T>() };
    *value = T::default();
}

/// # Safety
///
/// `value` must hold a `T`.
unsafe fn doubled<T>(value: RawValue) -> RawValue
where
    T: Clone + Extend<T::Item> + IntoIterator + 'static,
{
    let vtable = value.vtable();
    // SAFETY: guaranteed by the caller
    let mut value = unsafe { value.into_value_unchecked::<T>() };
    let copy = value.clone();
    value.extend(copy);
    RawValue::new_in(value, vtable)
}

/// # Safety
///
/// `value` must hold a `T`.
unsafe fn identity<T: 'static>(value: RawValue) -> RawValue {
    value
}

// SAFETY: Every slot is instantiated for `String`
static STRING_VTABLE: Vtable<Slots> = unsafe {
    Vtable::<Slots>::new::<String>((describe::<String>, reset::<String>, identity::<String>))
};

// SAFETY: Every slot is instantiated for `Vec<u32>`
static VEC_VTABLE: Vtable<Slots> = unsafe {
    Vtable::<Slots>::new::<Vec<u32>>((
        describe::<Vec<u32>>,
        reset::<Vec<u32>>,
        doubled::<Vec<u32>>,
    ))
};

fn slots(value: RawValueRef<'_>) -> &'static Slots {
    let vtable = value.vtable();
    assert!(
        vtable == VtableRef::new(&STRING_VTABLE) || vtable == VtableRef::new(&VEC_VTABLE),
        "unexpected vtable {vtable:?}"
    );
    // SAFETY: both vtables used in this file carry `Slots`
    unsafe { vtable.typed::<Slots>() }.slots()
}

#[test]
fn test_slots_dispatch_to_the_stored_type() {
    let values = [
        RawValue::new(String::from("hello"), &STRING_VTABLE),
        RawValue::new(vec![1_u32, 2, 3], &VEC_VTABLE),
    ];

    let described: Vec<String> = values
        .iter()
        .map(|value| {
            let describe = slots(value.as_ref()).0;
            // SAFETY: the slot comes from the vtable of the value it is applied to
            unsafe { describe(value.as_ref()) }
        })
        .collect();

    assert_eq!(described, ["\"hello\"", "[1, 2, 3]"]);
}

#[test]
fn test_mutating_slot() {
    let mut value = RawValue::new(String::from("dirty"), &STRING_VTABLE);
    let reset = slots(value.as_ref()).1;
    // SAFETY: the slot comes from the vtable of the value it is applied to
    unsafe { reset(value.as_mut()) };

    assert_eq!(value.as_ref().downcast::<String>().unwrap(), "");
    assert_eq!(value.as_ref().type_name(), std::any::type_name::<String>());
}

#[test]
fn test_consuming_slot_rewraps_with_same_vtable() {
    let value = RawValue::new(vec![4_u32, 5], &VEC_VTABLE);
    let original_vtable = value.vtable();
    let doubled = slots(value.as_ref()).2;

    // SAFETY: the slot comes from the vtable of the value it is applied to
    let value = unsafe { doubled(value) };
    assert_eq!(value.vtable(), original_vtable);
    assert_eq!(value.try_into_value::<Vec<u32>>().unwrap(), [4, 5, 4, 5]);
}

#[derive(Clone, Debug, Default)]
struct Tracked(Option<Rc<Cell<usize>>>);

impl Drop for Tracked {
    fn drop(&mut self) {
        if let Some(drops) = &self.0 {
            drops.set(drops.get() + 1);
        }
    }
}

#[test]
fn test_clone_and_drop_accounting() {
    // SAFETY: Every slot is instantiated for `Tracked`
    static TRACKED_VTABLE: Vtable<Slots> = unsafe {
        Vtable::<Slots>::new::<Tracked>((
            describe::<Tracked>,
            reset::<Tracked>,
            identity::<Tracked>,
        ))
    };

    let drops = Rc::new(Cell::new(0));
    let original = RawValue::new(Tracked(Some(drops.clone())), &TRACKED_VTABLE);
    let copies: Vec<RawValue> = (0..3).map(|_| original.as_ref().clone_value()).collect();
    assert_eq!(drops.get(), 0);

    let mut first = original;
    let reset = slots_of_tracked(first.as_ref()).1;
    // SAFETY: the slot comes from the vtable of the value it is applied to
    unsafe { reset(first.as_mut()) };
    // Resetting replaced (and dropped) the tracked value
    assert_eq!(drops.get(), 1);

    drop(copies);
    assert_eq!(drops.get(), 4);
    drop(first);
    assert_eq!(drops.get(), 4);

    fn slots_of_tracked(value: RawValueRef<'_>) -> &'static Slots {
        assert_eq!(value.vtable(), VtableRef::new(&TRACKED_VTABLE));
        // SAFETY: `TRACKED_VTABLE` carries `Slots`
        unsafe { value.vtable().typed::<Slots>() }.slots()
    }
}
