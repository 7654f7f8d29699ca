//! The value-semantic, type-erased storage behind every interface.
//!
//! [`Erased<S, Th>`] owns at most one value of some concrete type, together
//! with a `&'static` dispatch table whose slots have the type `S`. It is the
//! single field of every struct generated by [`interface!`](crate::interface!)
//! and carries all of the lifecycle rules those structs share:
//!
//! | state       | entered by                                   | usable |
//! |-------------|----------------------------------------------|--------|
//! | `Empty`     | [`Erased::empty`], [`Default`]                | no     |
//! | `Holding`   | an interface's `new`, cloning a holding value | yes    |
//! | `MovedFrom` | [`Erased::take`]                             | no     |
//!
//! Calling an operation, casting, or asking for the identity of a value that
//! is not holding anything is a precondition violation and panics. Dropping
//! and assigning are allowed in every state.

use core::marker::PhantomData;

use poly_internals::{RawValue, RawValueMut, RawValueRef, Vtable};

use crate::{
    CastError, TypeIdentity,
    markers::{self, ObjectMarkerFor},
};

/// The observable lifecycle state of an [`Erased`] value.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum ErasedState {
    /// Default-constructed; no value and no dispatch table.
    Empty,
    /// Holding a value and its dispatch table.
    Holding,
    /// The value was moved out with [`Erased::take`].
    MovedFrom,
}

/// Storage for the current state, keeping the raw value private.
enum State {
    /// See [`ErasedState::Empty`].
    Empty,
    /// See [`ErasedState::Holding`].
    Holding(RawValue),
    /// See [`ErasedState::MovedFrom`].
    MovedFrom,
}

/// A type-erased value whose dispatch table has the slots `S`.
///
/// The thread-safety marker `Th` is either [`markers::Local`] (the default)
/// or [`markers::SendSync`]; only values that are
/// [`ObjectMarkerFor<Th>`](ObjectMarkerFor) can be stored.
///
/// # Safety Invariant
///
/// When holding a value, the vtable of the raw value was created as a
/// `&'static Vtable<S>`, and the held value is `ObjectMarkerFor<Th>`.
///
/// Values are only erased inside this crate, with the dispatch table the
/// interface's model builds for the concrete type:
///
/// ```compile_fail
/// use poly::{Erased, __private::Vtable};
///
/// // SAFETY: There are no slots.
/// static TABLE: Vtable<()> = unsafe { Vtable::new::<u8>(()) };
/// let erased: Erased<()> = Erased::new(7_u8, &TABLE);
/// ```
pub struct Erased<S: 'static, Th: 'static = markers::Local> {
    /// The current state.
    state: State,
    /// Ties the slot type and thread-safety marker to this value.
    _marker: PhantomData<(fn() -> S, Th)>,
}

// SAFETY: Only values that are `ObjectMarkerFor<SendSync>`, i.e. `Send + Sync`,
// can be stored in an `Erased<S, SendSync>`, and dispatch tables are immutable
// `'static` data.
unsafe impl<S: 'static> Send for Erased<S, markers::SendSync> {}

// SAFETY: See the `Send` implementation above.
unsafe impl<S: 'static> Sync for Erased<S, markers::SendSync> {}

impl<S: 'static, Th: 'static> Erased<S, Th> {
    /// Creates a value in the `Empty` state.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            state: State::Empty,
            _marker: PhantomData,
        }
    }

    /// Erases `value`, pairing it with `vtable`.
    ///
    /// # Panics
    ///
    /// Panics if `vtable` was created for a type other than `T`.
    #[inline]
    #[track_caller]
    pub(crate) fn new<T>(value: T, vtable: &'static Vtable<S>) -> Self
    where
        T: ObjectMarkerFor<Th>,
    {
        Self {
            state: State::Holding(RawValue::new(value, vtable)),
            _marker: PhantomData,
        }
    }

    /// Wraps an already erased value.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The vtable of `raw` was created as a `&'static Vtable<S>`.
    /// 2. The value held by `raw` is `ObjectMarkerFor<Th>`.
    #[inline]
    pub unsafe fn from_raw(raw: RawValue) -> Self {
        Self {
            state: State::Holding(raw),
            _marker: PhantomData,
        }
    }

    /// Returns the lifecycle state of this value.
    #[inline]
    pub fn state(&self) -> ErasedState {
        match self.state {
            State::Empty => ErasedState::Empty,
            State::Holding(_) => ErasedState::Holding,
            State::MovedFrom => ErasedState::MovedFrom,
        }
    }

    /// Returns `true` if this value is holding something.
    #[inline]
    pub fn is_holding(&self) -> bool {
        matches!(self.state, State::Holding(_))
    }

    /// Returns the raw held value.
    ///
    /// # Panics
    ///
    /// Panics if this value is empty or moved-from.
    #[inline]
    #[track_caller]
    pub fn raw(&self) -> RawValueRef<'_> {
        match &self.state {
            State::Holding(raw) => raw.as_ref(),
            _ => not_holding(self.state()),
        }
    }

    /// Returns the raw held value for mutation.
    ///
    /// # Panics
    ///
    /// Panics if this value is empty or moved-from.
    #[inline]
    #[track_caller]
    pub fn raw_mut(&mut self) -> RawValueMut<'_> {
        let state = self.state();
        match &mut self.state {
            State::Holding(raw) => raw.as_mut(),
            _ => not_holding(state),
        }
    }

    /// Unwraps the raw held value.
    ///
    /// # Panics
    ///
    /// Panics if this value is empty or moved-from.
    #[inline]
    #[track_caller]
    pub fn into_raw(self) -> RawValue {
        let state = self.state();
        match self.state {
            State::Holding(raw) => raw,
            _ => not_holding(state),
        }
    }

    /// Returns the slots of the dispatch table of the held value.
    ///
    /// # Panics
    ///
    /// Panics if this value is empty or moved-from.
    #[inline]
    #[track_caller]
    pub fn slots(&self) -> &'static S {
        let vtable = self.raw().vtable();
        // SAFETY: Holding values always carry a vtable created as a
        // `&'static Vtable<S>` (see the invariant on `Erased`).
        let vtable: &'static Vtable<S> = unsafe { vtable.typed::<S>() };
        vtable.slots()
    }

    /// Returns the identity of the held type.
    ///
    /// # Panics
    ///
    /// Panics if this value is empty or moved-from.
    #[inline]
    #[track_caller]
    pub fn identity(&self) -> TypeIdentity {
        TypeIdentity::from_vtable(self.raw().vtable())
    }

    /// Moves the held value out into a new [`Erased`], leaving this one in
    /// the `MovedFrom` state. Taking from an empty value yields an empty
    /// value.
    ///
    /// # Panics
    ///
    /// Panics if this value is already moved-from.
    #[track_caller]
    pub fn take(&mut self) -> Self {
        let taken = Self {
            state: core::mem::replace(&mut self.state, State::MovedFrom),
            _marker: PhantomData,
        };
        if let State::MovedFrom = taken.state {
            not_holding(ErasedState::MovedFrom);
        }
        tracing::trace!(state = ?taken.state(), "moved value out of interface");
        taken
    }

    /// Returns a reference to the held value if it is a `T`.
    ///
    /// # Panics
    ///
    /// Panics if this value is empty or moved-from.
    #[track_caller]
    pub fn cast<T: 'static>(&self) -> Result<&T, CastError> {
        let raw = self.raw();
        raw.downcast::<T>()
            .ok_or_else(|| mismatch::<T>(self.identity()))
    }

    /// Returns a mutable reference to the held value if it is a `T`.
    ///
    /// # Panics
    ///
    /// Panics if this value is empty or moved-from.
    #[track_caller]
    pub fn cast_mut<T: 'static>(&mut self) -> Result<&mut T, CastError> {
        let held = self.identity();
        self.raw_mut()
            .downcast::<T>()
            .ok_or_else(|| mismatch::<T>(held))
    }

    /// Moves the held value out if it is a `T`, or gives `self` back
    /// unchanged.
    ///
    /// # Panics
    ///
    /// Panics if this value is empty or moved-from.
    #[track_caller]
    pub fn downcast<T: 'static>(self) -> Result<T, Self> {
        let held = self.identity();
        self.into_raw().try_into_value::<T>().map_err(|raw| {
            mismatch::<T>(held);
            Self {
                state: State::Holding(raw),
                _marker: PhantomData,
            }
        })
    }
}

/// Builds (and logs) the error for a failed cast to `T`.
#[cold]
fn mismatch<T: 'static>(held: TypeIdentity) -> CastError {
    let error = CastError::new(TypeIdentity::of::<T>(), held);
    tracing::debug!(
        requested = error.requested().type_name(),
        held = error.held().type_name(),
        "interface cast failed"
    );
    error
}

/// Reports a precondition violation: an operation on a value that is not
/// holding anything.
#[cold]
#[inline(never)]
#[track_caller]
fn not_holding(state: ErasedState) -> ! {
    tracing::error!(?state, "operation on an interface value that holds nothing");
    match state {
        ErasedState::MovedFrom => panic!("operation on a moved-from interface value"),
        _ => panic!("operation on an empty interface value"),
    }
}

impl<S: 'static, Th: 'static> Clone for Erased<S, Th> {
    /// Deep-copies the held value. The copy shares the dispatch table but
    /// never the storage.
    ///
    /// # Panics
    ///
    /// Panics if this value is moved-from.
    #[track_caller]
    fn clone(&self) -> Self {
        let state = match &self.state {
            State::Empty => State::Empty,
            State::Holding(raw) => State::Holding(raw.as_ref().clone_value()),
            State::MovedFrom => not_holding(ErasedState::MovedFrom),
        };
        Self {
            state,
            _marker: PhantomData,
        }
    }
}

impl<S: 'static, Th: 'static> Default for Erased<S, Th> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: 'static, Th: 'static> core::fmt::Debug for Erased<S, Th> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.state {
            State::Holding(raw) => f
                .debug_tuple("Holding")
                .field(&raw.as_ref().type_name())
                .finish(),
            State::Empty => f.write_str("Empty"),
            State::MovedFrom => f.write_str("MovedFrom"),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String, vec, vec::Vec};

    use super::*;

    type Slots = (fn() -> &'static str,);

    // SAFETY: The slot does not receive an erased value.
    static STRING_VTABLE: Vtable<Slots> =
        unsafe { Vtable::<Slots>::new::<String>((|| "string",)) };
    // SAFETY: The slot does not receive an erased value.
    static BYTES_VTABLE: Vtable<Slots> =
        unsafe { Vtable::<Slots>::new::<Vec<u8>>((|| "bytes",)) };

    #[test]
    fn test_states() {
        let mut value: Erased<Slots> = Erased::empty();
        assert_eq!(value.state(), ErasedState::Empty);
        assert!(!value.is_holding());

        value = Erased::new(String::from("text"), &STRING_VTABLE);
        assert_eq!(value.state(), ErasedState::Holding);
        assert_eq!((value.slots().0)(), "string");

        let taken = value.take();
        assert_eq!(value.state(), ErasedState::MovedFrom);
        assert_eq!(taken.state(), ErasedState::Holding);

        value = Erased::new(vec![1_u8], &BYTES_VTABLE);
        assert_eq!(value.state(), ErasedState::Holding);
        assert_eq!((value.slots().0)(), "bytes");

        let mut empty: Erased<Slots> = Erased::default();
        assert_eq!(empty.take().state(), ErasedState::Empty);
        assert_eq!(empty.state(), ErasedState::MovedFrom);
    }

    #[test]
    fn test_clone_is_deep() {
        let original: Erased<Slots> = Erased::new(String::from("a"), &STRING_VTABLE);
        let mut copy = original.clone();
        copy.cast_mut::<String>().unwrap().push('b');

        assert_eq!(original.cast::<String>().unwrap(), "a");
        assert_eq!(copy.cast::<String>().unwrap(), "ab");
        assert_eq!(copy.identity(), original.identity());

        let empty: Erased<Slots> = Erased::empty();
        assert_eq!(empty.clone().state(), ErasedState::Empty);
    }

    #[test]
    fn test_cast_mismatch() {
        let value: Erased<Slots> = Erased::new(vec![1_u8, 2], &BYTES_VTABLE);
        let error = value.cast::<String>().unwrap_err();
        assert!(error.requested().is::<String>());
        assert!(error.held().is::<Vec<u8>>());

        let value = value.downcast::<String>().unwrap_err();
        assert_eq!(value.downcast::<Vec<u8>>().unwrap(), [1, 2]);
    }

    #[test]
    fn test_debug() {
        let value: Erased<Slots> = Erased::new(String::new(), &STRING_VTABLE);
        assert_eq!(
            format!("{value:?}"),
            format!("Holding({:?})", core::any::type_name::<String>())
        );
        assert_eq!(format!("{:?}", Erased::<Slots>::empty()), "Empty");
    }

    #[test]
    #[should_panic(expected = "operation on an empty interface value")]
    fn test_empty_identity_panics() {
        let value: Erased<Slots> = Erased::empty();
        let _ = value.identity();
    }

    #[test]
    #[should_panic(expected = "operation on a moved-from interface value")]
    fn test_moved_from_clone_panics() {
        let mut value: Erased<Slots> = Erased::new(String::new(), &STRING_VTABLE);
        let _taken = value.take();
        let _ = value.clone();
    }

    #[test]
    #[should_panic(expected = "cannot store a value of type")]
    fn test_mismatched_vtable_panics() {
        let _: Erased<Slots> = Erased::new(vec![1_u8], &STRING_VTABLE);
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_impl_all!(Erased<Slots, markers::SendSync>: Send, Sync);
        static_assertions::assert_not_impl_any!(Erased<Slots, markers::Local>: Send, Sync);
    }
}
