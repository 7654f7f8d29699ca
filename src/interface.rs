//! The trait implemented by every struct generated by
//! [`interface!`](crate::interface!).

use crate::{
    CastError, TypeIdentity,
    erased::{Erased, ErasedState},
};

/// A value-semantic, type-erasing container with a fixed set of operations.
///
/// Implemented by [`interface!`](crate::interface!); the four conversion
/// methods expose the underlying [`Erased`] storage and everything else is
/// provided on top of them. The slot tuple of every generated interface
/// carries the interface's own type, so storage cannot be moved between two
/// interfaces.
pub trait Interface: Sized + 'static {
    /// The slot tuple of the dispatch table.
    type Slots: 'static;

    /// Either [`SendSync`](crate::markers::SendSync) or
    /// [`Local`](crate::markers::Local).
    type ThreadSafety: 'static;

    /// The name of the interface, used in diagnostics.
    const NAME: &'static str;

    /// Wraps erased storage.
    ///
    /// # Safety
    ///
    /// If `erased` holds a value, its dispatch table must have been built for
    /// the held type by the model trait of this interface. Storage obtained
    /// from [`into_erased`](Self::into_erased) or
    /// [`as_erased_mut`](Self::as_erased_mut) of the same interface always
    /// qualifies.
    ///
    /// Wrapping storage is not possible from safe code:
    ///
    /// ```compile_fail
    /// use poly::prelude::*;
    ///
    /// callable! {
    ///     pub struct Name;
    /// }
    ///
    /// impl<'a> Call<(&'a u8,)> for Name {
    ///     type Output = u8;
    ///     fn call(self, (value,): (&'a u8,)) -> u8 {
    ///         *value
    ///     }
    /// }
    ///
    /// interface! {
    ///     pub struct Named: NamedModel {
    ///         fn name = Name(self: &Self) -> u8;
    ///     }
    /// }
    ///
    /// let erased = Named::new(7_u8).into_erased();
    /// let _ = Named::from_erased(erased);
    /// ```
    ///
    /// The storage of one interface never has the type of another's, even
    /// when their operations have the same signatures:
    ///
    /// ```compile_fail
    /// use poly::prelude::*;
    ///
    /// callable! {
    ///     pub struct Name;
    ///     pub struct Secret;
    /// }
    ///
    /// impl<'a> Call<(&'a u8,)> for Name {
    ///     type Output = u8;
    ///     fn call(self, (value,): (&'a u8,)) -> u8 {
    ///         *value
    ///     }
    /// }
    ///
    /// interface! {
    ///     pub struct Named: NamedModel {
    ///         fn name = Name(self: &Self) -> u8;
    ///     }
    /// }
    ///
    /// interface! {
    ///     pub struct Secretive: SecretiveModel {
    ///         fn secret = Secret(self: &Self) -> u8;
    ///     }
    /// }
    ///
    /// let erased = Named::new(7_u8).into_erased();
    /// let _ = unsafe { Secretive::from_erased(erased) };
    /// ```
    unsafe fn from_erased(erased: Erased<Self::Slots, Self::ThreadSafety>) -> Self;

    /// Returns the erased storage.
    fn as_erased(&self) -> &Erased<Self::Slots, Self::ThreadSafety>;

    /// Returns the erased storage for mutation.
    fn as_erased_mut(&mut self) -> &mut Erased<Self::Slots, Self::ThreadSafety>;

    /// Unwraps the erased storage.
    fn into_erased(self) -> Erased<Self::Slots, Self::ThreadSafety>;

    /// Returns a reference to the held value if it is a `T`.
    ///
    /// # Panics
    ///
    /// Panics if this value is empty or moved-from.
    #[inline]
    #[track_caller]
    fn cast<T: 'static>(&self) -> Result<&T, CastError> {
        self.as_erased().cast::<T>()
    }

    /// Returns a mutable reference to the held value if it is a `T`.
    ///
    /// # Panics
    ///
    /// Panics if this value is empty or moved-from.
    #[inline]
    #[track_caller]
    fn cast_mut<T: 'static>(&mut self) -> Result<&mut T, CastError> {
        self.as_erased_mut().cast_mut::<T>()
    }

    /// Moves the held value out if it is a `T`, or gives `self` back.
    ///
    /// # Panics
    ///
    /// Panics if this value is empty or moved-from.
    #[inline]
    #[track_caller]
    fn downcast<T: 'static>(self) -> Result<T, Self> {
        self.into_erased().downcast::<T>().map_err(|erased| {
            // SAFETY: The storage came out of `self` unchanged.
            unsafe { Self::from_erased(erased) }
        })
    }

    /// Returns the identity of the held type.
    ///
    /// # Panics
    ///
    /// Panics if this value is empty or moved-from.
    #[inline]
    #[track_caller]
    fn identity(&self) -> TypeIdentity {
        self.as_erased().identity()
    }

    /// Returns the lifecycle state of this value.
    #[inline]
    fn state(&self) -> ErasedState {
        self.as_erased().state()
    }

    /// Returns `true` if this value holds something.
    #[inline]
    fn is_holding(&self) -> bool {
        self.as_erased().is_holding()
    }

    /// Moves the held value into a new interface value, leaving this one
    /// moved-from.
    ///
    /// # Panics
    ///
    /// Panics if this value is already moved-from.
    #[inline]
    #[track_caller]
    fn take(&mut self) -> Self {
        let taken = self.as_erased_mut().take();
        // SAFETY: The held value and its dispatch table were moved out of
        // `self` together.
        unsafe { Self::from_erased(taken) }
    }
}
