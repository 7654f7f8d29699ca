//! Module containing the erased value storage and its dispatch tables

mod data;
mod raw;
mod vtable;

pub use self::{
    raw::{RawValue, RawValueMut, RawValueRef},
    vtable::{Vtable, VtableRef},
};
