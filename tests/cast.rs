//! Recovering the concrete type held by an interface value.

use poly::{CastError, TypeIdentity, prelude::*};

callable! {
    pub struct Show;
}

impl<'a, T: core::fmt::Display> Call<(&'a T,)> for Show {
    type Output = String;

    fn call(self, (value,): (&'a T,)) -> String {
        value.to_string()
    }
}

interface! {
    pub struct Showable: ShowableModel {
        fn show = Show(self: &Self) -> String;
    }
}

#[test]
fn test_cast_to_held_type() {
    let value = Showable::new(123_i32);

    assert_eq!(value.cast::<i32>(), Ok(&123));
    assert_eq!(poly::cast::<i32, _>(&value), Ok(&123));
    assert!(value.identity().is::<i32>());
    assert_eq!(value.identity(), TypeIdentity::of::<i32>());
}

#[test]
fn test_cast_to_other_type() {
    let value = Showable::new(123_i32);
    let error = value.cast::<f64>().unwrap_err();

    assert_eq!(
        error,
        CastError::new(TypeIdentity::of::<f64>(), TypeIdentity::of::<i32>())
    );
    assert!(error.requested().is::<f64>());
    assert!(error.held().is::<i32>());
    assert_eq!(
        error.to_string(),
        "type mismatch: requested `f64`, but the value holds `i32`"
    );

    // Casting is exact; no conversions are attempted.
    assert!(value.cast::<i64>().is_err());
    assert!(value.cast::<Showable>().is_err());
}

#[test]
fn test_cast_mut_changes_held_value() {
    let mut value = Showable::new(String::from("abc"));
    value.cast_mut::<String>().unwrap().push('d');
    assert_eq!(value.show(), "abcd");

    *poly::cast_mut::<String, _>(&mut value).unwrap() = String::from("xyz");
    assert_eq!(value.show(), "xyz");

    assert!(value.cast_mut::<&str>().is_err());
    assert_eq!(value.show(), "xyz");
}

#[test]
fn test_downcast() {
    let value = Showable::new(2.5_f64);

    let value = match value.downcast::<f32>() {
        Ok(_) => panic!("downcast to the wrong type succeeded"),
        Err(value) => value,
    };
    assert!(value.is_holding());
    assert_eq!(value.show(), "2.5");

    assert_eq!(value.downcast::<f64>().ok(), Some(2.5));
}

#[test]
fn test_casts_on_copies() {
    let original = Showable::new(String::from("ab"));
    let mut copy = original.clone();
    copy.cast_mut::<String>().unwrap().push('c');

    assert_eq!(original.cast::<String>().unwrap(), "ab");
    assert_eq!(copy.cast::<String>().unwrap(), "abc");
}
