//! Marker types and traits for thread-safety and slot binding.
//!
//! # Thread Safety Markers
//!
//! Thread safety markers control whether interface values can be sent between
//! threads or shared across threads. An interface declared with
//! `+ Send + Sync` uses [`SendSync`]; every other interface uses [`Local`].
//!
//! - [`SendSync`]: The interface value and the value it holds are
//!   `Send + Sync`, allowing it to cross thread boundaries.
//! - [`Local`]: The held value may contain non-thread-safe data (like `Rc` or
//!   raw pointers) and the interface value cannot be sent between threads.
//!
//! The constraints encoded by these markers are enforced at construction time
//! through [`ObjectMarkerFor`]: it is impossible to construct a `SendSync`
//! interface value around a type that is not `Send + Sync`.
//!
//! The same markers select the counter used by
//! [`CopyOnWrite`](crate::cow::CopyOnWrite).
//!
//! # Binding Markers
//!
//! [`ByTag`] and [`BySelf`] record where the implementation of one
//! descriptor was found when an interface's dispatch table is composed for a
//! concrete type. They are inferred and almost never written by hand; see
//! [`Bind`](crate::Bind).
//!
//! # Examples
//!
//! ```
//! use std::rc::Rc;
//!
//! use poly::prelude::*;
//!
//! callable! {
//!     /// Measures a value.
//!     pub struct Size;
//! }
//!
//! impl<'a> Call<(&'a String,)> for Size {
//!     type Output = usize;
//!     fn call(self, (text,): (&'a String,)) -> usize {
//!         text.len()
//!     }
//! }
//!
//! impl<'a> Call<(&'a Rc<String>,)> for Size {
//!     type Output = usize;
//!     fn call(self, (text,): (&'a Rc<String>,)) -> usize {
//!         text.len()
//!     }
//! }
//!
//! interface! {
//!     pub struct Measured: MeasuredModel + Send + Sync {
//!         fn size = Size(self: &Self) -> usize;
//!     }
//! }
//!
//! interface! {
//!     pub struct LocalMeasured: LocalMeasuredModel {
//!         fn size = Size(self: &Self) -> usize;
//!     }
//! }
//!
//! // Thread-safe interface values can be sent to another thread
//! let shared = Measured::new(String::from("four"));
//! std::thread::spawn(move || assert_eq!(shared.size(), 4))
//!     .join()
//!     .unwrap();
//!
//! // Rc is not Send or Sync, so it can only be stored in a local interface
//! let local = LocalMeasured::new(Rc::new(String::from("five!")));
//! assert_eq!(local.size(), 5);
//! ```

/// Marker type indicating that an interface value is `Send + Sync`.
///
/// Interfaces declared with `+ Send + Sync` only accept values that are
/// `Send + Sync` themselves, and the resulting interface values can be moved
/// to and shared with other threads.
///
/// For [`CopyOnWrite`](crate::cow::CopyOnWrite), this marker selects an
/// atomically reference-counted backing store.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct SendSync;

/// Marker type indicating that an interface value is not `Send` or `Sync`.
///
/// This is the thread-safety of every interface declared without
/// `+ Send + Sync`. Such interfaces accept any `'static` value, including
/// values that contain `Rc<T>`, raw pointers or other thread-local data.
///
/// For [`CopyOnWrite`](crate::cow::CopyOnWrite), this marker selects a
/// non-atomic reference count.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Local;

/// Marker trait for types that can be stored behind the thread-safety marker
/// `T`.
///
/// - For `T = Local`: Implemented for all `Sized + 'static` types.
/// - For `T = SendSync`: Implemented only for `Sized + 'static` types that are
///   also `Send + Sync`.
///
/// # Examples
///
/// ```compile_fail
/// use std::rc::Rc;
///
/// use poly::markers::{ObjectMarkerFor, SendSync};
///
/// fn requires_send_sync<T: ObjectMarkerFor<SendSync>>(_: T) {}
///
/// requires_send_sync(Rc::new(1));
/// ```
pub trait ObjectMarkerFor<T>: Sized + 'static {}

impl<O: Sized + 'static> ObjectMarkerFor<Local> for O {}

impl<O: Sized + 'static> ObjectMarkerFor<SendSync> for O where O: Send + Sync {}

/// Binding marker: the descriptor is implemented by the operation tag itself,
/// through [`Call`](crate::Call).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct ByTag;

/// Binding marker: the descriptor is implemented by the type in the `self`
/// position, through [`Overload`](crate::Overload).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct BySelf;
