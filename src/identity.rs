//! Runtime identity of the concrete type held by an interface value.

use core::any::TypeId;

use poly_internals::VtableRef;

/// The identity of a concrete type, as recorded in a dispatch table.
///
/// Two identities are equal exactly when they describe the same type; the
/// human-readable name only participates in formatting.
///
/// # Examples
///
/// ```
/// use poly::TypeIdentity;
///
/// assert_eq!(TypeIdentity::of::<i32>(), TypeIdentity::of::<i32>());
/// assert_ne!(TypeIdentity::of::<i32>(), TypeIdentity::of::<u32>());
/// assert!(TypeIdentity::of::<String>().is::<String>());
/// assert_eq!(TypeIdentity::of::<u8>().to_string(), "u8");
/// ```
#[derive(Clone, Copy)]
pub struct TypeIdentity {
    /// The [`TypeId`] of the type.
    id: TypeId,
    /// The [`core::any::type_name`] of the type.
    name: &'static str,
}

impl TypeIdentity {
    /// Returns the identity of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
        }
    }

    /// Reads the identity recorded in a dispatch table.
    #[inline]
    pub(crate) fn from_vtable(vtable: VtableRef) -> Self {
        Self {
            id: vtable.type_id(),
            name: vtable.type_name(),
        }
    }

    /// Returns the [`TypeId`] of the type.
    #[inline]
    pub fn type_id(self) -> TypeId {
        self.id
    }

    /// Returns the name of the type, as given by [`core::any::type_name`].
    #[inline]
    pub fn type_name(self) -> &'static str {
        self.name
    }

    /// Returns `true` if this is the identity of `T`.
    #[inline]
    pub fn is<T: ?Sized + 'static>(self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeIdentity {}

impl core::hash::Hash for TypeIdentity {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl core::fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("TypeIdentity").field(&self.name).finish()
    }
}

impl core::fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name)
    }
}
