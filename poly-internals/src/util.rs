//! Internal utility types.

/// Marker type used in place of a type parameter whose concrete type has been
/// erased.
///
/// `ValueData<Erased>` is a value of unknown type, and `Vtable<Erased>` is a
/// vtable of which only the header may be read. Using a distinct marker type
/// (rather than `()`) makes the intent clearer in type signatures and error
/// messages.
pub(crate) struct Erased;
