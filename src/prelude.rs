//! Commonly used items for convenient importing.
//!
//! # Usage
//!
//! ```rust
//! use poly::prelude::*;
//!
//! callable! {
//!     pub struct Twice;
//! }
//!
//! impl Call<(u8,)> for Twice {
//!     type Output = u16;
//!     fn call(self, (value,): (u8,)) -> u16 {
//!         u16::from(value) * 2
//!     }
//! }
//!
//! assert_eq!(call!(Twice, 200_u8), 400);
//! ```
//!
//! # What's Included
//!
//! - **[`callable!`]**, **[`call!`]** and **[`interface!`]**: Declaring
//!   operations, invoking them, and declaring interfaces
//! - **[`Callable`]**, **[`Call`]**, **[`Fallback`]**, **[`Fold`]** and
//!   **[`Overload`]**: The traits implementations are written against
//! - **[`Interface`]**: Methods shared by every interface, such as casts
//! - **[`markers`]**: Thread-safety markers

pub use crate::{
    Call, Callable, Fallback, Fold, Interface, Overload, call, callable, interface, markers,
};
