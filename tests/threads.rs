//! Thread-safe and thread-local interfaces.

use std::{rc::Rc, sync::Arc, thread};

use poly::prelude::*;
use static_assertions::{assert_impl_all, assert_not_impl_any};

callable! {
    pub struct Length;
}

impl<'a> Call<(&'a String,)> for Length {
    type Output = usize;

    fn call(self, (text,): (&'a String,)) -> usize {
        text.len()
    }
}

impl<'a> Call<(&'a Vec<u8>,)> for Length {
    type Output = usize;

    fn call(self, (bytes,): (&'a Vec<u8>,)) -> usize {
        bytes.len()
    }
}

impl<'a> Call<(&'a Rc<str>,)> for Length {
    type Output = usize;

    fn call(self, (text,): (&'a Rc<str>,)) -> usize {
        text.len()
    }
}

interface! {
    pub struct Measured: MeasuredModel + Send + Sync {
        fn length = Length(self: &Self) -> usize;
    }
}

interface! {
    pub struct LocalMeasured: LocalMeasuredModel {
        fn length = Length(self: &Self) -> usize;
    }
}

assert_impl_all!(Measured: Send, Sync, Clone, Default);
assert_not_impl_any!(LocalMeasured: Send, Sync);

assert_impl_all!(String: MeasuredModel<(poly::markers::ByTag,)>);
assert_not_impl_any!(Rc<str>: MeasuredModel<(poly::markers::ByTag,)>);
assert_impl_all!(Rc<str>: LocalMeasuredModel<(poly::markers::ByTag,)>);

#[test]
fn test_values_move_between_threads() {
    let values = vec![Measured::new(String::from("abc")), Measured::new(vec![1_u8, 2])];

    let lengths = thread::spawn(move || values.iter().map(Measured::length).collect::<Vec<_>>())
        .join()
        .unwrap();
    assert_eq!(lengths, [3, 2]);
}

#[test]
fn test_values_are_shared_between_threads() {
    let value = Arc::new(Measured::new(String::from("shared")));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let value = Arc::clone(&value);
            thread::spawn(move || value.length())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 6);
    }
}

#[test]
fn test_local_values() {
    let text: Rc<str> = Rc::from("local");
    let value = LocalMeasured::new(Rc::clone(&text));
    let copy = value.clone();

    assert_eq!(copy.length(), 5);
    // The clone copied the `Rc`, not the string.
    assert_eq!(Rc::strong_count(&text), 3);
}
