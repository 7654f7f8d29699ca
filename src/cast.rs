//! Recovering the concrete type held by an interface value.

use crate::{TypeIdentity, interface::Interface};

/// Error returned when an interface value is cast to a type it does not hold.
///
/// # Examples
///
/// ```
/// use poly::{CastError, TypeIdentity};
///
/// let error = CastError::new(TypeIdentity::of::<f64>(), TypeIdentity::of::<i32>());
/// assert_eq!(
///     error.to_string(),
///     "type mismatch: requested `f64`, but the value holds `i32`"
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CastError {
    /// The type the caller asked for.
    requested: TypeIdentity,
    /// The type actually held.
    held: TypeIdentity,
}

impl CastError {
    /// Creates a new [`CastError`].
    #[must_use]
    pub fn new(requested: TypeIdentity, held: TypeIdentity) -> Self {
        Self { requested, held }
    }

    /// The type the caller asked for.
    #[must_use]
    pub fn requested(&self) -> TypeIdentity {
        self.requested
    }

    /// The type actually held.
    #[must_use]
    pub fn held(&self) -> TypeIdentity {
        self.held
    }
}

impl core::fmt::Display for CastError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "type mismatch: requested `{}`, but the value holds `{}`",
            self.requested, self.held
        )
    }
}

impl core::error::Error for CastError {}

/// Returns a reference to the value held by `value` if it is a `T`.
///
/// # Panics
///
/// Panics if `value` is empty or moved-from.
///
/// # Examples
///
/// ```
/// use poly::prelude::*;
///
/// callable! {
///     pub struct Show;
/// }
///
/// impl<'a, T: core::fmt::Display> Call<(&'a T,)> for Show {
///     type Output = String;
///     fn call(self, (value,): (&'a T,)) -> String {
///         value.to_string()
///     }
/// }
///
/// interface! {
///     pub struct Showable: ShowableModel {
///         fn show = Show(self: &Self) -> String;
///     }
/// }
///
/// let value = Showable::new(123_i32);
/// assert_eq!(poly::cast::<i32, _>(&value), Ok(&123));
///
/// let error = poly::cast::<f64, _>(&value).unwrap_err();
/// assert!(error.held().is::<i32>());
/// ```
#[track_caller]
pub fn cast<T: 'static, I: Interface>(value: &I) -> Result<&T, CastError> {
    value.as_erased().cast::<T>()
}

/// Returns a mutable reference to the value held by `value` if it is a `T`.
///
/// # Panics
///
/// Panics if `value` is empty or moved-from.
#[track_caller]
pub fn cast_mut<T: 'static, I: Interface>(value: &mut I) -> Result<&mut T, CastError> {
    value.as_erased_mut().cast_mut::<T>()
}
