//! Operation tags and the registries they dispatch through.
//!
//! An operation tag is a zero-sized value naming one polymorphic operation.
//! Tags are declared with [`callable!`](crate::callable!), and the
//! implementations of a tag live in two kinds of registries:
//!
//! - The tag's **home registry**: [`Call`] implementations for exact argument
//!   tuples, [`Fallback`] implementations meant to catch whatever the exact
//!   ones do not, and the [`Fold`] opt-in for left folds over arities of three
//!   and more.
//! - **Type-associated registries**: [`Overload`] implementations keyed on the
//!   type of one argument. These can be written next to a type even when the
//!   tag is declared in another crate.
//!
//! [`call!`](crate::call!) picks exactly one implementation out of these
//! registries, in this order:
//!
//! 1. an exact match: a [`Call`] on the tag, or an [`Overload`] on the type
//!    of one of the first four arguments
//! 2. a [`Fallback`] on the tag
//! 3. a left fold through the tag's binary [`Call`], if the tag is [`Fold`]
//!
//! Exact matches all share the first rank. If more than one applies, the
//! call does not compile.
//!
//! Wrapping a tag in [`Shadowed`] keeps its home registry but makes it
//! invisible to every [`Overload`], which opts a call site out of
//! argument-directed lookup.
//!
//! # Examples
//!
//! ```
//! use poly::prelude::*;
//!
//! callable! {
//!     /// Subtraction, and negation when given a single argument.
//!     pub struct Minus;
//! }
//!
//! impl<A: core::ops::Neg> Call<(A,)> for Minus {
//!     type Output = A::Output;
//!     fn call(self, (a,): (A,)) -> A::Output {
//!         -a
//!     }
//! }
//!
//! impl<A: core::ops::Sub<B>, B> Call<(A, B)> for Minus {
//!     type Output = A::Output;
//!     fn call(self, (a, b): (A, B)) -> A::Output {
//!         a - b
//!     }
//! }
//!
//! impl Fold for Minus {}
//!
//! assert_eq!(call!(Minus, 3), -3);
//! assert_eq!(call!(Minus, 10, 4), 6);
//! assert_eq!(call!(Minus, 10, 4, 3, 2), 1);
//!
//! let negated: Vec<i32> = [1, 2, 3].into_iter().map(Minus.unary::<i32>()).collect();
//! assert_eq!(negated, [-1, -2, -3]);
//! ```

/// A zero-sized value naming one polymorphic operation.
///
/// Implement this with [`callable!`](crate::callable!) rather than by hand.
pub trait Callable: Copy + Sized + 'static {
    /// The name of the operation, used in diagnostics.
    const NAME: &'static str;

    /// Rebinds this tag so that it ignores every [`Overload`].
    ///
    /// # Examples
    ///
    /// ```
    /// use poly::prelude::*;
    ///
    /// callable! {
    ///     pub struct Describe;
    /// }
    ///
    /// impl<T: core::fmt::Debug> Fallback<(T,)> for Describe {
    ///     type Output = String;
    ///     fn call_fallback(self, (value,): (T,)) -> String {
    ///         format!("{value:?}")
    ///     }
    /// }
    ///
    /// #[derive(Debug)]
    /// struct Secret;
    ///
    /// impl Overload<Describe, (Secret,)> for Secret {
    ///     type Output = String;
    ///     fn overload(_: Describe, _: (Secret,)) -> String {
    ///         String::from("<redacted>")
    ///     }
    /// }
    ///
    /// assert_eq!(call!(Describe, Secret), "<redacted>");
    /// assert_eq!(call!(Describe.shadowed(), Secret), "Secret");
    /// ```
    #[inline]
    fn shadowed(self) -> Shadowed<Self> {
        Shadowed(self)
    }

    /// Returns this operation as a unary function.
    #[inline]
    fn unary<A>(self) -> impl Fn(A) -> <Self as Call<(A,)>>::Output + Copy
    where
        Self: Call<(A,)>,
    {
        move |a| self.call((a,))
    }

    /// Returns this operation as a binary function.
    #[inline]
    fn binary<A, B>(self) -> impl Fn(A, B) -> <Self as Call<(A, B)>>::Output + Copy
    where
        Self: Call<(A, B)>,
    {
        move |a, b| self.call((a, b))
    }

    /// Returns this operation as a function taking its arguments as one tuple,
    /// which is convenient with iterator adapters such as
    /// [`zip`](core::iter::Iterator::zip).
    #[inline]
    fn tupled<Args>(self) -> impl Fn(Args) -> <Self as Call<Args>>::Output + Copy
    where
        Self: Call<Args>,
    {
        move |args| self.call(args)
    }
}

/// An exact implementation of the operation `Self` for the argument tuple
/// `Args`, living in the tag's home registry.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not implemented for the arguments `{Args}`",
    label = "no exact implementation of `{Self}`"
)]
pub trait Call<Args>: Callable {
    /// The result of the operation.
    type Output;

    /// Performs the operation.
    fn call(self, args: Args) -> Self::Output;
}

/// A fallback implementation of the operation `Self`, typically generic over
/// its arguments.
///
/// Fallbacks rank below every [`Call`] and [`Overload`] candidate, so they
/// can be broad without getting in the way of more specific implementations.
pub trait Fallback<Args>: Callable {
    /// The result of the operation.
    type Output;

    /// Performs the operation.
    fn call_fallback(self, args: Args) -> Self::Output;
}

/// Opt-in marker: for three or more arguments, the operation is a left fold
/// over its binary [`Call`] form, so `op(a, b, c, d)` is
/// `op(op(op(a, b), c), d)`.
pub trait Fold: Callable {}

/// Tuples that can be left-folded with the binary form of `T`.
///
/// Implemented for tuples of two to eight elements.
pub trait Foldable<T: Callable> {
    /// The result of the fold.
    type Output;

    /// Folds the tuple from the left.
    fn fold(self, tag: T) -> Self::Output;
}

impl<T, A, B> Foldable<T> for (A, B)
where
    T: Call<(A, B)>,
{
    type Output = T::Output;

    #[inline]
    fn fold(self, tag: T) -> Self::Output {
        tag.call(self)
    }
}

/// Implements [`Foldable`] for one tuple arity by reducing its first two
/// elements and folding the shorter tuple.
macro_rules! impl_foldable {
    ($($rest:ident)+) => {
        impl<T, A, B, $($rest),+> Foldable<T> for (A, B, $($rest),+)
        where
            T: Call<(A, B)>,
            (<T as Call<(A, B)>>::Output, $($rest),+): Foldable<T>,
        {
            type Output = <(<T as Call<(A, B)>>::Output, $($rest),+) as Foldable<T>>::Output;

            #[inline]
            #[allow(non_snake_case)]
            fn fold(self, tag: T) -> Self::Output {
                let (a, b, $($rest),+) = self;
                (tag.call((a, b)), $($rest),+).fold(tag)
            }
        }
    };
}

impl_foldable!(C);
impl_foldable!(C D);
impl_foldable!(C D E);
impl_foldable!(C D E F);
impl_foldable!(C D E F G);
impl_foldable!(C D E F G H);

/// An implementation of the operation `T` found through the type of the
/// argument at position `N` (zero-based, first by default).
///
/// Implement this on the exact argument type (for example `&'a Point` when
/// the operation borrows a point) and name the position it takes in `Args`.
/// Since the implementing type is local to the crate that owns it, this works
/// for tags declared anywhere. [`call!`](crate::call!) looks at the first four
/// positions.
///
/// # Examples
///
/// ```
/// use poly::prelude::*;
///
/// callable! {
///     pub struct Area;
/// }
///
/// struct Square(f64);
///
/// impl<'a> Overload<Area, (&'a Square,)> for &'a Square {
///     type Output = f64;
///     fn overload(_: Area, (square,): (&'a Square,)) -> f64 {
///         square.0 * square.0
///     }
/// }
///
/// assert_eq!(call!(Area, &Square(3.0)), 9.0);
/// ```
///
/// A type that is not the first argument names its position:
///
/// ```
/// use poly::prelude::*;
///
/// callable! {
///     pub struct Scale;
/// }
///
/// struct Square(f64);
///
/// impl<'a> Overload<Scale, (f64, &'a Square), 1> for &'a Square {
///     type Output = Square;
///     fn overload(_: Scale, (by, square): (f64, &'a Square)) -> Square {
///         Square(square.0 * by)
///     }
/// }
///
/// assert_eq!(call!(Scale, 2.0, &Square(3.0)).0, 6.0);
/// ```
pub trait Overload<T: Callable, Args, const N: usize = 0> {
    /// The result of the operation.
    type Output;

    /// Performs the operation.
    fn overload(tag: T, args: Args) -> Self::Output;
}

/// A rebinding of the operation `T` that only dispatches through the tag's
/// home registry.
///
/// See [`Callable::shadowed`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Shadowed<T>(pub T);

impl<T: Callable> Callable for Shadowed<T> {
    const NAME: &'static str = T::NAME;
}

impl<T: Call<Args>, Args> Call<Args> for Shadowed<T> {
    type Output = T::Output;

    #[inline]
    fn call(self, args: Args) -> Self::Output {
        self.0.call(args)
    }
}

impl<T: Fallback<Args>, Args> Fallback<Args> for Shadowed<T> {
    type Output = T::Output;

    #[inline]
    fn call_fallback(self, args: Args) -> Self::Output {
        self.0.call_fallback(args)
    }
}

impl<T: Fold> Fold for Shadowed<T> {}
