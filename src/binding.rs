//! Binding of interface descriptors to implementations.

use crate::{
    callable::{Call, Callable, Overload},
    markers::{BySelf, ByTag},
};

/// The implementation of the operation `Self` for the argument tuple `Args`,
/// where `S` is the type in the `self` position `N` and `Via` records which
/// registry provides it.
///
/// This is what an interface's model trait requires of a concrete type, once
/// per descriptor:
///
/// - `Via = `[`ByTag`]: the tag's own [`Call<Args>`] applies.
/// - `Via = `[`BySelf`]: the `self` type's [`Overload<Self, Args, N>`]
///   applies.
///
/// `Via` is inferred when an interface value is constructed. If neither
/// registry applies, construction fails to compile because the model trait
/// is not implemented. If both apply, `Via` cannot be inferred and
/// construction fails to compile as ambiguous. Either way the problem is
/// reported before any value exists.
///
/// Generic fallbacks and folds are call-site conveniences of
/// [`call!`](crate::call!) and are not considered here.
pub trait Bind<S, Args, Via, const N: usize>: Callable {
    /// The result of the operation.
    type Output;

    /// Performs the operation.
    fn bind(self, args: Args) -> Self::Output;
}

impl<T, S, Args, const N: usize> Bind<S, Args, ByTag, N> for T
where
    T: Call<Args>,
{
    type Output = T::Output;

    #[inline]
    fn bind(self, args: Args) -> Self::Output {
        self.call(args)
    }
}

impl<T, S, Args, const N: usize> Bind<S, Args, BySelf, N> for T
where
    T: Callable,
    S: Overload<T, Args, N>,
{
    type Output = S::Output;

    #[inline]
    fn bind(self, args: Args) -> Self::Output {
        S::overload(self, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    struct Double;

    impl Callable for Double {
        const NAME: &'static str = "Double";
    }

    impl Call<(u32,)> for Double {
        type Output = u32;

        fn call(self, (value,): (u32,)) -> u32 {
            value * 2
        }
    }

    struct Meters(f64);

    impl Overload<Double, (Meters,)> for Meters {
        type Output = Meters;

        fn overload(_: Double, (Meters(value),): (Meters,)) -> Meters {
            Meters(value * 2.0)
        }
    }

    impl Overload<Double, (u32, Meters), 1> for Meters {
        type Output = Meters;

        fn overload(_: Double, (times, Meters(value)): (u32, Meters)) -> Meters {
            Meters(value * f64::from(2 * times))
        }
    }

    fn bound<S, Args, Via, const N: usize>(args: Args) -> <Double as Bind<S, Args, Via, N>>::Output
    where
        Double: Bind<S, Args, Via, N>,
    {
        Double.bind(args)
    }

    #[test]
    fn test_binding_is_inferred() {
        assert_eq!(bound::<u32, _, _, 0>((21_u32,)), 42);
        assert_eq!(bound::<Meters, _, _, 0>((Meters(1.5),)).0, 3.0);
        assert_eq!(bound::<Meters, _, _, 1>((2_u32, Meters(1.5))).0, 6.0);
    }

    #[test]
    fn test_unbound_types() {
        static_assertions::assert_impl_all!(Double: Bind<u32, (u32,), ByTag, 0>);
        static_assertions::assert_not_impl_any!(Double: Bind<u32, (u32,), BySelf, 0>);
        static_assertions::assert_impl_all!(Double: Bind<Meters, (Meters,), BySelf, 0>);
        static_assertions::assert_not_impl_any!(Double: Bind<Meters, (Meters,), ByTag, 0>);
        static_assertions::assert_not_impl_any!(
            Double: Bind<i8, (i8,), ByTag, 0>,
            Bind<i8, (i8,), BySelf, 0>
        );
    }

    #[test]
    fn test_self_position_must_match() {
        static_assertions::assert_impl_all!(Double: Bind<Meters, (u32, Meters), BySelf, 1>);
        static_assertions::assert_not_impl_any!(Double: Bind<Meters, (u32, Meters), BySelf, 0>);
        static_assertions::assert_not_impl_any!(Double: Bind<Meters, (Meters,), BySelf, 1>);
    }
}
