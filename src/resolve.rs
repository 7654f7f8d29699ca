//! Candidate ranking for [`call!`](crate::call!).
//!
//! Not public API. The macro wraps the tag and the argument tuple in a
//! [`Wrap`] behind four references and calls `strategy()` on it. Method
//! resolution strips one reference per step and stops at the first kind
//! trait whose where-clauses may hold, so the kind with the most references
//! in its `Self` type is the highest ranked:
//!
//! | references | kind               | strategy         |
//! |------------|--------------------|------------------|
//! | 3          | [`ExactKind`]      | [`ViaExact<V>`]  |
//! | 2          | [`FallbackKind`]   | [`ViaFallback`]  |
//! | 1          | [`FoldKind`]       | [`ViaFold`]      |
//! | 0          | [`UnresolvedKind`] | [`Unresolved`]   |
//!
//! The exact tier is a single trait, [`Exact`], implemented once for the
//! tag's own [`Call`] and once per argument position for an [`Overload`] on
//! that argument. Which one applies is left to inference through `V`: a
//! unique match fixes `V`, and two matches leave it ambiguous, which is a
//! compile error rather than a silent pick.
//!
//! The chosen strategy is then consumed through [`Invoke`], which
//! [`Unresolved`] does not implement.

use core::marker::PhantomData;

use crate::callable::{Call, Callable, Fallback, Fold, Foldable, Overload};

#[doc(hidden)]
pub struct Wrap<'a, T, A>(pub &'a T, pub &'a A);

/// Marks the tag's own [`Call`] in the exact tier.
#[doc(hidden)]
#[derive(Clone, Copy, Debug)]
pub struct ViaTag;

/// Marks an [`Overload`] on the argument at position `N` in the exact tier.
#[doc(hidden)]
#[derive(Clone, Copy, Debug)]
pub struct ViaArgument<const N: usize>;

#[doc(hidden)]
pub struct ViaExact<V>(PhantomData<V>);

#[doc(hidden)]
#[derive(Clone, Copy, Debug)]
pub struct ViaFallback;

#[doc(hidden)]
#[derive(Clone, Copy, Debug)]
pub struct ViaFold;

#[doc(hidden)]
#[derive(Clone, Copy, Debug)]
pub struct Unresolved;

/// An exact implementation of the tag `Self` for the arguments `A`, found
/// through `V`.
#[doc(hidden)]
pub trait Exact<A, V>: Callable {
    type Output;

    fn exact(self, args: A) -> Self::Output;
}

impl<T: Call<A>, A> Exact<A, ViaTag> for T {
    type Output = T::Output;

    #[inline(always)]
    fn exact(self, args: A) -> Self::Output {
        self.call(args)
    }
}

#[doc(hidden)]
pub trait ExactKind<V> {
    #[inline(always)]
    fn strategy(&self) -> ViaExact<V> {
        ViaExact(PhantomData)
    }
}

impl<T: Exact<A, V>, A, V> ExactKind<V> for &&&Wrap<'_, T, A> {}

#[doc(hidden)]
pub trait FallbackKind {
    #[inline(always)]
    fn strategy(&self) -> ViaFallback {
        ViaFallback
    }
}

impl<T: Fallback<A>, A> FallbackKind for &&Wrap<'_, T, A> {}

#[doc(hidden)]
pub trait FoldKind {
    #[inline(always)]
    fn strategy(&self) -> ViaFold {
        ViaFold
    }
}

impl<T: Fold, A: Foldable<T>> FoldKind for &Wrap<'_, T, A> {}

#[doc(hidden)]
pub trait UnresolvedKind {
    #[inline(always)]
    fn strategy(&self) -> Unresolved {
        Unresolved
    }
}

impl<T, A> UnresolvedKind for Wrap<'_, T, A> {}

/// Consumes a resolution strategy.
#[doc(hidden)]
#[diagnostic::on_unimplemented(
    message = "no implementation of `{T}` accepts the arguments `{A}`",
    label = "unresolved call",
    note = "implement `Call` or `Fallback` for the tag, `Overload` for one of the \
            argument types, or `Fold` to fold a binary implementation"
)]
pub trait Invoke<T, A> {
    type Output;

    fn invoke(self, tag: T, args: A) -> Self::Output;
}

impl<T: Exact<A, V>, A, V> Invoke<T, A> for ViaExact<V> {
    type Output = T::Output;

    #[inline(always)]
    fn invoke(self, tag: T, args: A) -> Self::Output {
        tag.exact(args)
    }
}

impl<T: Fallback<A>, A> Invoke<T, A> for ViaFallback {
    type Output = T::Output;

    #[inline(always)]
    fn invoke(self, tag: T, args: A) -> Self::Output {
        tag.call_fallback(args)
    }
}

impl<T: Fold, A: Foldable<T>> Invoke<T, A> for ViaFold {
    type Output = A::Output;

    #[inline(always)]
    fn invoke(self, tag: T, args: A) -> Self::Output {
        args.fold(tag)
    }
}

/// Implements [`Exact`] for one argument position of one arity. The argument
/// at that position must provide an [`Overload`] for that position.
macro_rules! argument_registry {
    ($($position:literal => $owner:ident in ($($arg:ident),+);)+) => {$(
        impl<T: Callable, $($arg),+> Exact<($($arg,)+), ViaArgument<$position>> for T
        where
            $owner: Overload<T, ($($arg,)+), $position>,
        {
            type Output = <$owner as Overload<T, ($($arg,)+), $position>>::Output;

            #[inline(always)]
            fn exact(self, args: ($($arg,)+)) -> Self::Output {
                <$owner as Overload<T, ($($arg,)+), $position>>::overload(self, args)
            }
        }
    )+};
}

argument_registry! {
    0 => A0 in (A0);
    0 => A0 in (A0, A1);
    0 => A0 in (A0, A1, A2);
    0 => A0 in (A0, A1, A2, A3);
    1 => A1 in (A0, A1);
    1 => A1 in (A0, A1, A2);
    1 => A1 in (A0, A1, A2, A3);
    2 => A2 in (A0, A1, A2);
    2 => A2 in (A0, A1, A2, A3);
    3 => A3 in (A0, A1, A2, A3);
}
