#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Named, overloadable operations and value-semantic type erasure.
//!
//! ## Overview
//!
//! This crate provides two cooperating mechanisms for writing polymorphic
//! code without inheritance:
//!
//! - **Callables**: zero-sized operation tags that behave like overloaded
//!   functions. Implementations can live next to the tag, or next to the type
//!   of one of the arguments, and [`call!`] picks the best one at compile
//!   time.
//! - **Interfaces**: nominal container types declared with [`interface!`].
//!   An interface lists the operations it supports; any `Clone` type that
//!   implements all of them can be stored in it, and the container dispatches
//!   every operation to whatever type it currently holds.
//!
//! Interface values behave like ordinary values. Cloning one deep-copies the
//! held value, assigning to one drops whatever it held before, and the held
//! type is only observable through the declared operations and explicit
//! casts. When copies are expensive, [`CopyOnWrite`](cow::CopyOnWrite) can be
//! stored instead to share the value until it is written to.
//!
//! ## Quick Example
//!
//! ```
//! use poly::prelude::*;
//!
//! callable! {
//!     /// Computes the area of a shape.
//!     pub struct Area;
//! }
//!
//! #[derive(Clone)]
//! struct Rect {
//!     width: f64,
//!     height: f64,
//! }
//!
//! #[derive(Clone)]
//! struct Disc {
//!     radius: f64,
//! }
//!
//! impl<'a> Call<(&'a Rect,)> for Area {
//!     type Output = f64;
//!     fn call(self, (rect,): (&'a Rect,)) -> f64 {
//!         rect.width * rect.height
//!     }
//! }
//!
//! impl<'a> Call<(&'a Disc,)> for Area {
//!     type Output = f64;
//!     fn call(self, (disc,): (&'a Disc,)) -> f64 {
//!         3.0 * disc.radius * disc.radius
//!     }
//! }
//!
//! interface! {
//!     /// Any shape with an area.
//!     pub struct Shape: ShapeModel {
//!         fn area = Area(self: &Self) -> f64;
//!     }
//! }
//!
//! let shapes = vec![
//!     Shape::new(Rect { width: 2.0, height: 3.0 }),
//!     Shape::new(Disc { radius: 1.0 }),
//! ];
//! let total: f64 = shapes.iter().map(Shape::area).sum();
//! assert_eq!(total, 9.0);
//!
//! assert!(shapes[1].cast::<Disc>().is_ok());
//! assert!(shapes[1].cast::<Rect>().is_err());
//! ```
//!
//! ## Resolution
//!
//! [`call!`] considers, in order: exact matches, a [`Fallback`] on the tag,
//! and finally a left fold for tags that implement [`Fold`]. An exact match
//! is a [`Call`] on the tag or an [`Overload`] on the type of one of the
//! first four arguments, and all of them share one rank. The first rank with
//! a candidate wins. If two exact matches apply, the call does not compile,
//! so resolution is never silently ambiguous. [`Callable::shadowed`] opts a
//! call out of every [`Overload`].
//!
//! ## Interfaces
//!
//! For every concrete type stored in an interface, a dispatch table is
//! composed at compile time from the implementations of its operations. A
//! type that lacks one of them cannot be stored at all; see [`Bind`] for the
//! details. Operations whose result is `Self` hand back a new interface
//! value holding the concrete result.
//!
//! Values can be in one of three states, described by [`ErasedState`]. Only
//! holding values can be used; operations on empty or moved-from values are
//! programmer errors and panic.
//!
//! For implementation details, see the [`poly-internals`] crate.
//!
//! [`poly-internals`]: poly_internals
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `trace` when a value is erased or
//! moved out, and when a shared copy-on-write value is copied, `debug` when a
//! cast fails, and `error` right before panicking on a value that holds
//! nothing.
//!
//! ## Features
//!
//! - `std`: enables the `std` features of `tracing` and `triomphe`. The crate
//!   is `no_std` (with `alloc`) otherwise.

extern crate alloc;

#[macro_use]
mod macros;

pub mod cow;
pub mod markers;
pub mod prelude;

mod binding;
mod callable;
mod cast;
mod erased;
mod identity;
mod interface;
mod resolve;

pub use self::{
    binding::Bind,
    callable::{Call, Callable, Fallback, Fold, Foldable, Overload, Shadowed},
    cast::{CastError, cast, cast_mut},
    erased::{Erased, ErasedState},
    identity::TypeIdentity,
    interface::Interface,
};

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    pub use poly_internals::{RawValue, RawValueMut, RawValueRef, Vtable, VtableRef};

    use crate::{Erased, Interface, markers::ObjectMarkerFor};

    #[doc(hidden)]
    pub mod kind {
        #[doc(hidden)]
        pub use crate::resolve::*;
    }

    /// Erases `value` into the interface `I`.
    ///
    /// # Safety
    ///
    /// `vtable` must have been built for `T` by the model trait of `I`.
    #[doc(hidden)]
    #[inline]
    #[must_use]
    #[track_caller]
    pub unsafe fn erase<I, T>(value: T, vtable: &'static Vtable<I::Slots>) -> I
    where
        I: Interface,
        T: ObjectMarkerFor<I::ThreadSafety>,
    {
        tracing::trace!(
            interface = I::NAME,
            value = core::any::type_name::<T>(),
            "erased value into interface"
        );
        let erased = Erased::new(value, vtable);
        // SAFETY: The caller vouches that `vtable` was built by the model of
        // `I`, and `Erased::new` checked that it was built for `T`.
        unsafe { I::from_erased(erased) }
    }
}
