/// Declares one or more operation tags.
///
/// Each tag is a unit struct deriving `Clone`, `Copy`, `Debug`, `Default`,
/// `PartialEq`, `Eq`, `PartialOrd`, `Ord` and `Hash`, and implementing
/// [`Callable`](crate::Callable). Attributes and doc comments are forwarded.
///
/// # Examples
///
/// ```
/// use poly::prelude::*;
///
/// callable! {
///     /// Renders a value for humans.
///     pub struct Render;
///
///     /// Merges two values.
///     struct Merge;
/// }
///
/// assert_eq!(<Render as Callable>::NAME, "Render");
/// assert_eq!(Merge, Merge::default());
/// ```
#[macro_export]
macro_rules! callable {
    ($($(#[$meta:meta])* $vis:vis struct $name:ident;)+) => {$(
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis struct $name;

        impl $crate::Callable for $name {
            const NAME: &'static str = ::core::stringify!($name);
        }
    )+};
}

/// Resolves and invokes an operation.
///
/// `call!(tag, a, b, ...)` selects exactly one implementation of `tag` for
/// the types of the arguments, ranked as follows:
///
/// 1. an exact match: a [`Call`](crate::Call) on the tag, or an
///    [`Overload`](crate::Overload) on the type of the first, second, third
///    or fourth argument
/// 2. a [`Fallback`](crate::Fallback) on the tag
/// 3. a left fold through the binary form, if the tag implements
///    [`Fold`](crate::Fold)
///
/// Resolution happens entirely at compile time; when nothing applies, or when
/// more than one exact match applies, the call does not compile.
///
/// # Examples
///
/// ```
/// use poly::prelude::*;
///
/// callable! {
///     pub struct Greet;
/// }
///
/// impl<'a> Call<(&'a str,)> for Greet {
///     type Output = String;
///     fn call(self, (name,): (&'a str,)) -> String {
///         format!("hello, {name}")
///     }
/// }
///
/// impl<T: core::fmt::Debug> Fallback<(T,)> for Greet {
///     type Output = String;
///     fn call_fallback(self, (value,): (T,)) -> String {
///         format!("hello, {value:?}")
///     }
/// }
///
/// assert_eq!(call!(Greet, "world"), "hello, world");
/// assert_eq!(call!(Greet, 42_u8), "hello, 42");
/// ```
///
/// An operation with no applicable implementation is rejected:
///
/// ```compile_fail
/// use poly::prelude::*;
///
/// callable! {
///     pub struct Greet;
/// }
///
/// let _ = call!(Greet, 42_u8);
/// ```
///
/// So is a call that both the tag and an argument type implement exactly:
///
/// ```compile_fail
/// use poly::prelude::*;
///
/// callable! {
///     pub struct Name;
/// }
///
/// struct Both;
///
/// impl<'a> Call<(&'a Both,)> for Name {
///     type Output = &'static str;
///     fn call(self, _: (&'a Both,)) -> &'static str {
///         "from the tag"
///     }
/// }
///
/// impl<'a> Overload<Name, (&'a Both,)> for &'a Both {
///     type Output = &'static str;
///     fn overload(_: Name, _: (&'a Both,)) -> &'static str {
///         "from the type"
///     }
/// }
///
/// let _ = call!(Name, &Both);
/// ```
///
/// And one that two argument types implement exactly:
///
/// ```compile_fail
/// use poly::prelude::*;
///
/// callable! {
///     pub struct Collide;
/// }
///
/// struct Ship;
/// struct Rock;
///
/// impl Overload<Collide, (Ship, Rock)> for Ship {
///     type Output = &'static str;
///     fn overload(_: Collide, _: (Ship, Rock)) -> &'static str {
///         "ship breaks"
///     }
/// }
///
/// impl Overload<Collide, (Ship, Rock), 1> for Rock {
///     type Output = &'static str;
///     fn overload(_: Collide, _: (Ship, Rock)) -> &'static str {
///         "rock breaks"
///     }
/// }
///
/// let _ = call!(Collide, Ship, Rock);
/// ```
#[macro_export]
macro_rules! call {
    ($tag:expr $(, $arg:expr)* $(,)?) => {{
        use $crate::__private::kind::*;
        let tag = $tag;
        let args = ($($arg,)*);
        let strategy = (&&&&Wrap(&tag, &args)).strategy();
        Invoke::invoke(strategy, tag, args)
    }};
}

/// Declares an interface: a value-semantic, type-erasing container with a
/// fixed, ordered set of operations.
///
/// ```text
/// interface! {
///     /// docs
///     pub struct Name: NameModel [+ Send + Sync] {
///         /// docs
///         fn method = Tag(param: Type, self: &Self, ...) [-> Type | -> Self];
///         ...
///     }
/// }
/// ```
///
/// Every descriptor names an operation tag and its signature. Exactly one
/// parameter is `self`, typed `Self`, `&Self` or `&mut Self`; it may appear
/// at any position. The other parameters are owned types or top-level
/// references (`&T`, `&mut T`) with elided lifetimes, and the return type is
/// either owned or `Self`.
///
/// The macro generates:
///
/// - `struct Name`, implementing [`Interface`](crate::Interface), `Clone`,
///   `Default` (empty) and `Debug`.
/// - `Name::new(value)`, which accepts any `Clone + 'static` type
///   implementing every descriptor, and `Name::empty()`.
/// - One method per descriptor, taking `&self`, `&mut self` or `self`
///   followed by the remaining parameters in order. A `Self` result is
///   returned as a new `Name`.
/// - `trait NameModel<V>`, implemented by exactly the types `Name::new`
///   accepts. `V` records how each descriptor was bound and is always
///   inferred.
/// - An [`Overload`](crate::Overload) for every descriptor on the type of
///   its `self` parameter, at the position of `self`, so
///   [`call!`](crate::call!) works on interface values whose `self` is among
///   the first four arguments.
///
/// A descriptor is implemented for a concrete type `T` either by the tag
/// itself, through [`Call`](crate::Call) with `T` substituted for `Self`, or
/// by `T`, through an [`Overload`](crate::Overload) at the position of
/// `self`. Exactly one of the two must apply, otherwise `Name::new` does not
/// compile. With `+ Send + Sync` the interface only accepts `Send + Sync`
/// values and is `Send + Sync` itself.
///
/// At most sixteen descriptors, each with at most sixteen parameters, are
/// supported.
///
/// # Examples
///
/// ```
/// use poly::prelude::*;
///
/// callable! {
///     pub struct Grow;
///     pub struct Label;
/// }
///
/// #[derive(Clone)]
/// struct Square(u32);
///
/// #[derive(Clone)]
/// struct Circle(u32);
///
/// impl Call<(Square, u32)> for Grow {
///     type Output = Square;
///     fn call(self, (square, by): (Square, u32)) -> Square {
///         Square(square.0 + by)
///     }
/// }
///
/// impl Call<(Circle, u32)> for Grow {
///     type Output = Circle;
///     fn call(self, (circle, by): (Circle, u32)) -> Circle {
///         Circle(circle.0 * by)
///     }
/// }
///
/// impl<'a> Call<(&'a Square,)> for Label {
///     type Output = String;
///     fn call(self, (square,): (&'a Square,)) -> String {
///         format!("square of side {}", square.0)
///     }
/// }
///
/// impl<'a> Overload<Label, (&'a Circle,)> for &'a Circle {
///     type Output = String;
///     fn overload(_: Label, (circle,): (&'a Circle,)) -> String {
///         format!("circle of radius {}", circle.0)
///     }
/// }
///
/// interface! {
///     /// A shape that can grow.
///     pub struct Shape: ShapeModel {
///         /// Returns a larger shape.
///         fn grow = Grow(self: Self, by: u32) -> Self;
///         /// Describes the shape.
///         fn label = Label(self: &Self) -> String;
///     }
/// }
///
/// let shapes = [Shape::new(Square(2)), Shape::new(Circle(3))];
/// let labels: Vec<String> = shapes.iter().cloned().map(|shape| shape.grow(2).label()).collect();
/// assert_eq!(labels, ["square of side 4", "circle of radius 6"]);
///
/// // The interface is itself a valid argument of its operations
/// assert_eq!(call!(Label, &shapes[0]), "square of side 2");
/// ```
///
/// A type that does not implement every descriptor is rejected:
///
/// ```compile_fail
/// use poly::prelude::*;
///
/// callable! {
///     pub struct Label;
/// }
///
/// interface! {
///     pub struct Labeled: LabeledModel {
///         fn label = Label(self: &Self) -> String;
///     }
/// }
///
/// let _ = Labeled::new(17_u64);
/// ```
#[macro_export]
macro_rules! interface {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $model:ident + Send + Sync {
            $($body:tt)*
        }
    ) => {
        $crate::__interface! {
            @parse
            this: __this
            head: [[$(#[$meta])*] [$vis] $name $model [$crate::markers::SendSync]]
            pool: [
                (0 __V0) (1 __V1) (2 __V2) (3 __V3) (4 __V4) (5 __V5) (6 __V6) (7 __V7)
                (8 __V8) (9 __V9) (10 __V10) (11 __V11)
                (12 __V12) (13 __V13) (14 __V14) (15 __V15)
            ]
            slots: []
            rest: [$($body)*]
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $model:ident {
            $($body:tt)*
        }
    ) => {
        $crate::__interface! {
            @parse
            this: __this
            head: [[$(#[$meta])*] [$vis] $name $model [$crate::markers::Local]]
            pool: [
                (0 __V0) (1 __V1) (2 __V2) (3 __V3) (4 __V4) (5 __V5) (6 __V6) (7 __V7)
                (8 __V8) (9 __V9) (10 __V10) (11 __V11)
                (12 __V12) (13 __V13) (14 __V14) (15 __V15)
            ]
            slots: []
            rest: [$($body)*]
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __interface {
    // Descriptors, one arm per return form.
    (
        @parse this: $this:ident head: $head:tt
        pool: [($idx:tt $v:ident) $($pool:tt)*] slots: $slots:tt
        rest: [
            $(#[$smeta:meta])*
            fn $slot:ident = $($tag:ident)::+ ($($params:tt)*) -> Self;
            $($rest:tt)*
        ]
    ) => {
        $crate::__interface! {
            @start
            { this: $this head: $head pool: [$($pool)*] slots: $slots rest: [$($rest)*] }
            this: $this
            slot: {
                idx: $idx v: $v meta: [$(#[$smeta])*] name: $slot tag: [$($tag)::+] ret: [self]
            }
            params: [$($params)*]
        }
    };
    (
        @parse this: $this:ident head: $head:tt
        pool: [($idx:tt $v:ident) $($pool:tt)*] slots: $slots:tt
        rest: [
            $(#[$smeta:meta])*
            fn $slot:ident = $($tag:ident)::+ ($($params:tt)*) -> $ret:ty;
            $($rest:tt)*
        ]
    ) => {
        $crate::__interface! {
            @start
            { this: $this head: $head pool: [$($pool)*] slots: $slots rest: [$($rest)*] }
            this: $this
            slot: {
                idx: $idx v: $v meta: [$(#[$smeta])*] name: $slot tag: [$($tag)::+] ret: [ty $ret]
            }
            params: [$($params)*]
        }
    };
    (
        @parse this: $this:ident head: $head:tt
        pool: [($idx:tt $v:ident) $($pool:tt)*] slots: $slots:tt
        rest: [
            $(#[$smeta:meta])*
            fn $slot:ident = $($tag:ident)::+ ($($params:tt)*);
            $($rest:tt)*
        ]
    ) => {
        $crate::__interface! {
            @start
            { this: $this head: $head pool: [$($pool)*] slots: $slots rest: [$($rest)*] }
            this: $this
            slot: {
                idx: $idx v: $v meta: [$(#[$smeta])*] name: $slot tag: [$($tag)::+] ret: [unit]
            }
            params: [$($params)*]
        }
    };
    (@parse this: $this:ident head: $head:tt pool: $pool:tt slots: $slots:tt rest: []) => {
        $crate::__interface! { @emit this: $this head: $head slots: $slots }
    };
    (@parse this: $this:ident head: $head:tt pool: [] slots: $slots:tt rest: [$($rest:tt)+]) => {
        ::core::compile_error!("an interface supports at most sixteen descriptors");
    };
    (
        @parse this: $this:ident head: $head:tt pool: $pool:tt slots: $slots:tt
        rest: [$($rest:tt)+]
    ) => {
        ::core::compile_error!(::core::concat!(
            "expected a descriptor of the form `fn name = Tag(params) -> Type;`, found `",
            ::core::stringify!($($rest)+),
            "`"
        ));
    };

    (@start $state:tt this: $this:ident slot: $slot:tt params: $params:tt) => {
        $crate::__interface! {
            @params $state this: $this slot: $slot self: [] entries: [] others: []
            at: [0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15]
            params: $params
        }
    };

    // Parameters of one descriptor. `at` yields the position of each one.
    (
        @params $state:tt this: $this:ident slot: { $($slot:tt)* } self: [$($prev:tt)+]
        entries: $entries:tt others: $others:tt at: $at:tt
        params: [self : $($params:tt)*]
    ) => {
        $crate::__interface! { @reject { $($slot)* } "has more than one `self` parameter" }
    };
    (
        @params $state:tt this: $this:ident slot: { $($slot:tt)* } self: $receiver:tt
        entries: $entries:tt others: $others:tt at: []
        params: [$($params:tt)+]
    ) => {
        $crate::__interface! { @reject { $($slot)* } "has more than sixteen parameters" }
    };
    (
        @params $state:tt this: $this:ident slot: $slot:tt self: []
        entries: [$($entries:tt)*] others: $others:tt at: [$n:tt $($at:tt)*]
        params: [self : Self $(, $($params:tt)*)?]
    ) => {
        $crate::__interface! {
            @params $state this: $this slot: $slot self: [owned $n]
            entries: [$($entries)* [self owned $this]] others: $others at: [$($at)*]
            params: [$($($params)*)?]
        }
    };
    (
        @params $state:tt this: $this:ident slot: $slot:tt self: []
        entries: [$($entries:tt)*] others: $others:tt at: [$n:tt $($at:tt)*]
        params: [self : &mut Self $(, $($params:tt)*)?]
    ) => {
        $crate::__interface! {
            @params $state this: $this slot: $slot self: [unique $n]
            entries: [$($entries)* [self unique $this]] others: $others at: [$($at)*]
            params: [$($($params)*)?]
        }
    };
    (
        @params $state:tt this: $this:ident slot: $slot:tt self: []
        entries: [$($entries:tt)*] others: $others:tt at: [$n:tt $($at:tt)*]
        params: [self : & Self $(, $($params:tt)*)?]
    ) => {
        $crate::__interface! {
            @params $state this: $this slot: $slot self: [shared $n]
            entries: [$($entries)* [self shared $this]] others: $others at: [$($at)*]
            params: [$($($params)*)?]
        }
    };
    (
        @params $state:tt this: $this:ident slot: { $($slot:tt)* } self: []
        entries: $entries:tt others: $others:tt at: $at:tt
        params: [self : $($params:tt)*]
    ) => {
        $crate::__interface! {
            @reject { $($slot)* } "must take `self` as `Self`, `&Self` or `&mut Self`"
        }
    };
    (
        @params $state:tt this: $this:ident slot: $slot:tt self: $receiver:tt
        entries: [$($entries:tt)*] others: [$($others:tt)*] at: [$n:tt $($at:tt)*]
        params: [$p:ident : &mut $t:ty $(, $($params:tt)*)?]
    ) => {
        $crate::__interface! {
            @params $state this: $this slot: $slot self: $receiver
            entries: [$($entries)* [param unique $p $t]] others: [$($others)* [$p [&mut $t]]]
            at: [$($at)*]
            params: [$($($params)*)?]
        }
    };
    (
        @params $state:tt this: $this:ident slot: $slot:tt self: $receiver:tt
        entries: [$($entries:tt)*] others: [$($others:tt)*] at: [$n:tt $($at:tt)*]
        params: [$p:ident : & $t:ty $(, $($params:tt)*)?]
    ) => {
        $crate::__interface! {
            @params $state this: $this slot: $slot self: $receiver
            entries: [$($entries)* [param shared $p $t]] others: [$($others)* [$p [&$t]]]
            at: [$($at)*]
            params: [$($($params)*)?]
        }
    };
    (
        @params $state:tt this: $this:ident slot: $slot:tt self: $receiver:tt
        entries: [$($entries:tt)*] others: [$($others:tt)*] at: [$n:tt $($at:tt)*]
        params: [$p:ident : $t:ty $(, $($params:tt)*)?]
    ) => {
        $crate::__interface! {
            @params $state this: $this slot: $slot self: $receiver
            entries: [$($entries)* [param owned $p $t]] others: [$($others)* [$p [$t]]]
            at: [$($at)*]
            params: [$($($params)*)?]
        }
    };
    (
        @params $state:tt this: $this:ident slot: { $($slot:tt)* } self: [$kind:ident $n:tt]
        entries: $entries:tt others: $others:tt at: $at:tt
        params: []
    ) => {
        $crate::__interface! {
            @push $state { $($slot)* self: [$kind $n] entries: $entries others: $others }
        }
    };
    (
        @params $state:tt this: $this:ident slot: { $($slot:tt)* } self: []
        entries: $entries:tt others: $others:tt at: $at:tt
        params: []
    ) => {
        $crate::__interface! { @reject { $($slot)* } "needs exactly one `self` parameter" }
    };
    (
        @params $state:tt this: $this:ident slot: { $($slot:tt)* } self: $receiver:tt
        entries: $entries:tt others: $others:tt at: $at:tt
        params: [$($params:tt)+]
    ) => {
        $crate::__interface! {
            @reject { $($slot)* } "has a parameter that is not of the form `name: Type`"
        }
    };

    (
        @push {
            this: $this:ident head: $head:tt pool: $pool:tt slots: [$($slots:tt)*] rest: $rest:tt
        }
        $record:tt
    ) => {
        $crate::__interface! {
            @parse this: $this head: $head pool: $pool slots: [$($slots)* $record] rest: $rest
        }
    };

    (
        @reject { idx: $idx:tt v: $v:ident meta: $meta:tt name: $slot:ident $($record:tt)* }
        $problem:literal
    ) => {
        ::core::compile_error!(::core::concat!(
            "the descriptor `", ::core::stringify!($slot), "` ", $problem
        ));
    };

    (
        @emit
        this: $this:ident
        head: [[$($meta:tt)*] [$vis:vis] $name:ident $model:ident [$marker:path]]
        slots: [$({
            idx: $idx:tt v: $v:ident meta: [$($smeta:tt)*] name: $slot:ident
            tag: [$($tag:ident)::+] ret: $ret:tt
            self: [$kind:ident $at:tt]
            entries: [$([$ek:ident $ekind:ident $ename:ident $($ety:ty)?])*]
            others: [$([$op:ident [$($opty:tt)*]])*]
        })*]
    ) => {
        $($meta)*
        #[derive(Clone, Default, Debug)]
        $vis struct $name(
            $crate::Erased<
                (
                    $(
                        $crate::__interface_param!(
                            @slot_ty $name $ret [$([$ek $ekind $ename $($ety)?])*]
                        ),
                    )*
                    ::core::marker::PhantomData<fn() -> $name>,
                ),
                $marker,
            >,
        );

        impl $crate::Interface for $name {
            type Slots = (
                $(
                    $crate::__interface_param!(
                        @slot_ty $name $ret [$([$ek $ekind $ename $($ety)?])*]
                    ),
                )*
                ::core::marker::PhantomData<fn() -> $name>,
            );
            type ThreadSafety = $marker;

            const NAME: &'static str = ::core::stringify!($name);

            #[inline]
            unsafe fn from_erased(erased: $crate::Erased<Self::Slots, Self::ThreadSafety>) -> Self {
                Self(erased)
            }

            #[inline]
            fn as_erased(&self) -> &$crate::Erased<Self::Slots, Self::ThreadSafety> {
                &self.0
            }

            #[inline]
            fn as_erased_mut(&mut self) -> &mut $crate::Erased<Self::Slots, Self::ThreadSafety> {
                &mut self.0
            }

            #[inline]
            fn into_erased(self) -> $crate::Erased<Self::Slots, Self::ThreadSafety> {
                self.0
            }
        }

        #[doc = ::core::concat!("Types that can be stored in [`", ::core::stringify!($name), "`].")]
        ///
        /// Implemented for every `Clone + 'static` type that implements each
        /// operation of the interface. The type parameter records how each
        /// operation was bound and is always inferred.
        $vis trait $model<__V>:
            ::core::clone::Clone + $crate::markers::ObjectMarkerFor<$marker>
        {
            #[doc(hidden)]
            const VTABLE: &'static $crate::__private::Vtable<<$name as $crate::Interface>::Slots>;
        }

        impl<__T, $($v),*> $model<($($v,)*)> for __T
        where
            __T: ::core::clone::Clone + $crate::markers::ObjectMarkerFor<$marker>,
            $(
                for<'__a> $($tag)::+: $crate::Bind<
                    $crate::__interface_param!(@self_ty __T '__a $kind),
                    $crate::__interface_param!(
                        @args_ty __T '__a [$([$ek $ekind $ename $($ety)?])*]
                    ),
                    $v,
                    $at,
                    Output = $crate::__interface_param!(@ret_ty __T $ret),
                >,
            )*
        {
            const VTABLE: &'static $crate::__private::Vtable<<$name as $crate::Interface>::Slots> =
            {
                $(
                    unsafe fn $slot<__S, __B>(
                        $(
                            $ename: $crate::__interface_param!(@raw_ty [$ek $ekind $ename $($ety)?])
                        ),*
                    ) -> $crate::__interface_param!(@slot_ret $name $ret)
                    where
                        __S: ::core::clone::Clone + $crate::markers::ObjectMarkerFor<$marker>,
                        for<'__a> $($tag)::+: $crate::Bind<
                            $crate::__interface_param!(@self_ty __S '__a $kind),
                            $crate::__interface_param!(
                                @args_ty __S '__a [$([$ek $ekind $ename $($ety)?])*]
                            ),
                            __B,
                            $at,
                            Output = $crate::__interface_param!(@ret_ty __S $ret),
                        >,
                    {
                        $crate::__interface_param!(@body $name $this __S $kind $ret {
                            <$($tag)::+ as $crate::Bind<
                                $crate::__interface_param!(@elided_self_ty __S $kind),
                                _,
                                __B,
                                $at,
                            >>::bind($($tag)::+, ($($ename,)*))
                        })
                    }
                )*

                // SAFETY: Every slot is instantiated for `__T`, and only
                // receives values paired with a vtable created for `__T`.
                unsafe {
                    &$crate::__private::Vtable::<<$name as $crate::Interface>::Slots>::new::<__T>(
                        ($($slot::<__T, $v>,)* ::core::marker::PhantomData,),
                    )
                }
            };
        }

        impl $name {
            #[doc = ::core::concat!(
                "Erases `value` into a new [`", ::core::stringify!($name), "`]."
            )]
            #[inline]
            #[track_caller]
            $vis fn new<__T, __V>(value: __T) -> Self
            where
                __T: $model<__V>,
            {
                let vtable = <__T as $model<__V>>::VTABLE;
                // SAFETY: The vtable was built by the model of this interface
                // for `__T`.
                unsafe { $crate::__private::erase::<Self, __T>(value, vtable) }
            }

            #[doc = ::core::concat!("Creates an empty [`", ::core::stringify!($name), "`].")]
            ///
            /// Every operation on an empty value panics until a value is
            /// assigned to it.
            #[inline]
            $vis const fn empty() -> Self {
                Self($crate::Erased::empty())
            }

            $(
                $crate::__interface_param! {
                    @method $vis [$($smeta)*] $name $slot $idx $kind $ret
                    [$([$ek $ekind $ename $($ety)?])*]
                    [$([$op [$($opty)*]])*]
                }
            )*
        }

        $(
            impl<'__a> $crate::Overload<
                $($tag)::+,
                $crate::__interface_param!(@args_ty $name '__a [$([$ek $ekind $ename $($ety)?])*]),
                $at,
            > for $crate::__interface_param!(@self_ty $name '__a $kind)
            {
                type Output = $crate::__interface_param!(@slot_ret $name $ret);

                #[inline]
                #[track_caller]
                fn overload(
                    _: $($tag)::+,
                    args: $crate::__interface_param!(
                        @args_ty $name '__a [$([$ek $ekind $ename $($ety)?])*]
                    ),
                ) -> Self::Output {
                    let ($($ename,)*) = args;
                    $this.$slot($($op),*)
                }
            }
        )*
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __interface_param {
    // Parameter types of a slot function.
    (@raw_ty [self shared $n:ident]) => { $crate::__private::RawValueRef<'_> };
    (@raw_ty [self unique $n:ident]) => { $crate::__private::RawValueMut<'_> };
    (@raw_ty [self owned $n:ident]) => { $crate::__private::RawValue };
    (@raw_ty [param shared $n:ident $t:ty]) => { &$t };
    (@raw_ty [param unique $n:ident $t:ty]) => { &mut $t };
    (@raw_ty [param owned $n:ident $t:ty]) => { $t };

    (@slot_ty $name:ident $ret:tt [$($entry:tt)*]) => {
        unsafe fn($($crate::__interface_param!(@raw_ty $entry)),*)
            -> $crate::__interface_param!(@slot_ret $name $ret)
    };

    // Parameter types with `Self` replaced by `$T`.
    (@bound_ty $T:ident $lt:lifetime [self $kind:ident $n:ident]) => {
        $crate::__interface_param!(@self_ty $T $lt $kind)
    };
    (@bound_ty $T:ident $lt:lifetime [param shared $n:ident $t:ty]) => { &$lt $t };
    (@bound_ty $T:ident $lt:lifetime [param unique $n:ident $t:ty]) => { &$lt mut $t };
    (@bound_ty $T:ident $lt:lifetime [param owned $n:ident $t:ty]) => { $t };

    (@args_ty $T:ident $lt:lifetime [$($entry:tt)*]) => {
        ($($crate::__interface_param!(@bound_ty $T $lt $entry),)*)
    };

    (@self_ty $T:ident $lt:lifetime shared) => { &$lt $T };
    (@self_ty $T:ident $lt:lifetime unique) => { &$lt mut $T };
    (@self_ty $T:ident $lt:lifetime owned) => { $T };

    (@elided_self_ty $T:ident shared) => { &$T };
    (@elided_self_ty $T:ident unique) => { &mut $T };
    (@elided_self_ty $T:ident owned) => { $T };

    // What an implementation returns, and what the slot returns.
    (@ret_ty $T:ident [self]) => { $T };
    (@ret_ty $T:ident [ty $ret:ty]) => { $ret };
    (@ret_ty $T:ident [unit]) => { () };

    (@slot_ret $name:ident [self]) => { $name };
    (@slot_ret $name:ident [ty $ret:ty]) => { $ret };
    (@slot_ret $name:ident [unit]) => { () };

    // Body of a slot function.
    (@body $name:ident $this:ident $S:ident $kind:ident [self] { $($call:tt)* }) => {{
        let vtable = $this.vtable();
        $crate::__interface_param! { @downcast $kind $this $S }
        let out: $S = $($call)*;
        let raw = $crate::__private::RawValue::new_in::<$S>(out, vtable);
        // SAFETY: `vtable` was read from a value of this interface holding a
        // `$S`, so it was created as a vtable of `$name` for `$S`, and `$S`
        // already satisfied the thread-safety marker of `$name`.
        let erased = unsafe { $crate::Erased::from_raw(raw) };
        // SAFETY: As above, the vtable was built by the model of `$name`.
        unsafe { <$name as $crate::Interface>::from_erased(erased) }
    }};
    (@body $name:ident $this:ident $S:ident $kind:ident $ret:tt { $($call:tt)* }) => {{
        $crate::__interface_param! { @downcast $kind $this $S }
        $($call)*
    }};

    (@downcast shared $this:ident $S:ident) => {
        // SAFETY: Slot functions instantiated for `$S` are only stored in
        // vtables created for `$S`, and are only called with values paired
        // with such a vtable.
        let $this: &$S = unsafe { $this.downcast_unchecked::<$S>() };
    };
    (@downcast unique $this:ident $S:ident) => {
        // SAFETY: See the shared case.
        let $this: &mut $S = unsafe { $this.downcast_unchecked::<$S>() };
    };
    (@downcast owned $this:ident $S:ident) => {
        // SAFETY: See the shared case.
        let $this: $S = unsafe { $this.into_value_unchecked::<$S>() };
    };

    // Argument of a slot call from an inherent method.
    (@pass $raw:ident [self $kind:ident $n:ident]) => { $raw };
    (@pass $raw:ident [param $kind:ident $n:ident $t:ty]) => { $n };

    // Inherent methods, one arm per receiver.
    (
        @method $vis:vis [$($smeta:tt)*] $name:ident $slot:ident $idx:tt shared $ret:tt
        [$($entry:tt)*] [$([$op:ident [$($opty:tt)*]])*]
    ) => {
        $($smeta)*
        #[inline]
        #[track_caller]
        $vis fn $slot(
            &self $(, $op: $($opty)*)*
        ) -> $crate::__interface_param!(@slot_ret $name $ret) {
            let slot = self.0.slots().$idx;
            let raw = self.0.raw();
            // SAFETY: `slot` and `raw` come from the same value, so `slot` was
            // instantiated for the type held by `raw`.
            unsafe { slot($($crate::__interface_param!(@pass raw $entry)),*) }
        }
    };
    (
        @method $vis:vis [$($smeta:tt)*] $name:ident $slot:ident $idx:tt unique $ret:tt
        [$($entry:tt)*] [$([$op:ident [$($opty:tt)*]])*]
    ) => {
        $($smeta)*
        #[inline]
        #[track_caller]
        $vis fn $slot(
            &mut self $(, $op: $($opty)*)*
        ) -> $crate::__interface_param!(@slot_ret $name $ret) {
            let slot = self.0.slots().$idx;
            let raw = self.0.raw_mut();
            // SAFETY: `slot` and `raw` come from the same value, so `slot` was
            // instantiated for the type held by `raw`.
            unsafe { slot($($crate::__interface_param!(@pass raw $entry)),*) }
        }
    };
    (
        @method $vis:vis [$($smeta:tt)*] $name:ident $slot:ident $idx:tt owned $ret:tt
        [$($entry:tt)*] [$([$op:ident [$($opty:tt)*]])*]
    ) => {
        $($smeta)*
        #[inline]
        #[track_caller]
        $vis fn $slot(
            self $(, $op: $($opty)*)*
        ) -> $crate::__interface_param!(@slot_ret $name $ret) {
            let slot = self.0.slots().$idx;
            let raw = self.0.into_raw();
            // SAFETY: `slot` and `raw` come from the same value, so `slot` was
            // instantiated for the type held by `raw`.
            unsafe { slot($($crate::__interface_param!(@pass raw $entry)),*) }
        }
    };
}
