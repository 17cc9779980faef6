use crate::node::{Mapped, TypeSchema};
use std::{
    any::{TypeId, type_name},
    fmt,
    hash::{Hash, Hasher},
};

///
/// TypeToken
///
/// Backing-type handle used to key descriptors. Equality and hashing use the
/// Rust `TypeId` only; the shape tells the registry whether the type can be
/// mapped at all.
///

#[derive(Clone, Copy)]
pub struct TypeToken {
    type_id: fn() -> TypeId,
    type_name: fn() -> &'static str,
    shape: TokenShape,
}

impl TypeToken {
    /// Token for a mapped record type.
    #[must_use]
    pub const fn of<T: Mapped>() -> Self {
        Self {
            type_id: TypeId::of::<T>,
            type_name: type_name::<T>,
            shape: TokenShape::Mapped(T::schema),
        }
    }

    /// Token for a primitive or built-in runtime type.
    #[must_use]
    pub const fn scalar<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>,
            type_name: type_name::<T>,
            shape: TokenShape::Scalar,
        }
    }

    /// Token for a closed enumeration (picklist-style values).
    #[must_use]
    pub const fn enumeration<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>,
            type_name: type_name::<T>,
            shape: TokenShape::Enumeration,
        }
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Fully-qualified Rust type path (diagnostics only).
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    #[must_use]
    pub const fn shape(&self) -> TokenShape {
        self.shape
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeToken").field(&self.type_name()).finish()
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id().hash(state);
    }
}

///
/// TokenShape
///

#[derive(Clone, Copy, Debug)]
pub enum TokenShape {
    Scalar,
    Enumeration,
    Mapped(fn() -> TypeSchema),
}

impl TokenShape {
    #[must_use]
    pub const fn is_mapped(self) -> bool {
        matches!(self, Self::Mapped(_))
    }
}
