#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`poly`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased storage and unsafe
//! operations that power the interface values of the [`poly`] crate. A value
//! of any type is boxed next to a pointer to its dispatch table, after which
//! the concrete type is forgotten until somebody asks for it back.
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on the [`poly`] crate, not
//! this one.
//!
//! # Architecture
//!
//! - [`Vtable`]: a `#[repr(C)]` dispatch table made of a fixed header (type
//!   identity, drop, clone) followed by a caller-chosen tuple of slots
//! - [`VtableRef`]: an untyped handle to a [`Vtable`], readable without
//!   knowing the slot type
//! - [`RawValue`]: an owned, [`Box`]-allocated value paired with its vtable
//! - [`RawValueRef`]/[`RawValueMut`]: borrowed handles (shared/mutable)
//!
//! # Safety Strategy
//!
//! When we erase `ValueData<T>` to `ValueData<Erased>` we must make sure that
//! the vtable stored next to the value still describes `T`. This crate
//! maintains that through:
//!
//! - **Module-based encapsulation**: the fields of the data and vtable types
//!   are private to their modules, so the pairing between a value and its
//!   vtable can only be established in one place
//! - **Checked construction**: [`RawValue::new`] and [`RawValue::new_in`]
//!   refuse a vtable that was built for a different type
//! - **`#[repr(C)]` layout**: the vtable pointer sits at offset zero of every
//!   value, and the vtable header sits at offset zero of every vtable, so both
//!   can be read without knowing any type parameter
//!
//! [`poly`]: https://docs.rs/poly/latest/poly/
//! [`Box`]: alloc::boxed::Box

extern crate alloc;

mod util;
mod value;

pub use self::value::{RawValue, RawValueMut, RawValueRef, Vtable, VtableRef};
