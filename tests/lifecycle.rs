//! Empty, holding and moved-from interface values.

use std::{cell::Cell, rc::Rc};

use poly::{ErasedState, prelude::*};

callable! {
    pub struct Ping;
}

impl<'a> Call<(&'a u32,)> for Ping {
    type Output = u32;

    fn call(self, (value,): (&'a u32,)) -> u32 {
        *value
    }
}

#[derive(Clone)]
struct Tracked {
    id: u32,
    drops: Rc<Cell<u32>>,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

impl<'a> Call<(&'a Tracked,)> for Ping {
    type Output = u32;

    fn call(self, (tracked,): (&'a Tracked,)) -> u32 {
        tracked.id
    }
}

interface! {
    pub struct Pingable: PingableModel {
        fn ping = Ping(self: &Self) -> u32;
    }
}

#[test]
fn test_states() {
    let mut value = Pingable::default();
    assert_eq!(value.state(), ErasedState::Empty);
    assert!(!value.is_holding());
    assert_eq!(format!("{value:?}"), "Pingable(Empty)");

    value = Pingable::new(7_u32);
    assert_eq!(value.state(), ErasedState::Holding);
    assert_eq!(value.ping(), 7);

    let taken = value.take();
    assert_eq!(value.state(), ErasedState::MovedFrom);
    assert_eq!(taken.state(), ErasedState::Holding);
    assert_eq!(taken.ping(), 7);
    assert_eq!(format!("{value:?}"), "Pingable(MovedFrom)");

    // A moved-from value can be assigned again.
    value = Pingable::new(8_u32);
    assert_eq!(value.ping(), 8);
}

#[test]
fn test_empty_values() {
    const EMPTY: Pingable = Pingable::empty();

    let copy = EMPTY.clone();
    assert_eq!(copy.state(), ErasedState::Empty);

    let mut empty = Pingable::empty();
    assert_eq!(empty.take().state(), ErasedState::Empty);
}

#[test]
#[should_panic(expected = "operation on an empty interface value")]
fn test_operation_on_empty_value() {
    let value = Pingable::empty();
    let _ = value.ping();
}

#[test]
#[should_panic(expected = "operation on a moved-from interface value")]
fn test_operation_on_moved_from_value() {
    let mut value = Pingable::new(1_u32);
    let _taken = value.take();
    let _ = value.ping();
}

#[test]
#[should_panic(expected = "operation on a moved-from interface value")]
fn test_clone_of_moved_from_value() {
    let mut value = Pingable::new(1_u32);
    let _taken = value.take();
    let _ = value.clone();
}

#[test]
#[should_panic(expected = "operation on an empty interface value")]
fn test_cast_on_empty_value() {
    let value = Pingable::empty();
    let _ = value.cast::<u32>();
}

#[test]
fn test_held_values_are_dropped_once() {
    let drops = Rc::new(Cell::new(0));
    let tracked = |id| Tracked {
        id,
        drops: Rc::clone(&drops),
    };

    let mut value = Pingable::new(tracked(1));
    let copy = value.clone();
    assert_eq!(drops.get(), 0);

    // Assigning drops the previously held value.
    value = Pingable::new(tracked(2));
    assert_eq!(drops.get(), 1);
    assert_eq!(value.ping(), 2);
    assert_eq!(copy.ping(), 1);

    let taken = value.take();
    assert_eq!(drops.get(), 1);
    drop(value);
    assert_eq!(drops.get(), 1);

    drop(taken);
    assert_eq!(drops.get(), 2);
    drop(copy);
    assert_eq!(drops.get(), 3);

    let held = Pingable::new(tracked(3));
    let recovered = held.downcast::<Tracked>().ok().unwrap();
    assert_eq!(drops.get(), 3);
    drop(recovered);
    assert_eq!(drops.get(), 4);
}
