//! Runtime descriptor model.
//!
//! Types in `model` are the runtime form of the declarative schema nodes in
//! `forcedb-schema`. They are built by the registry, published once, and
//! never mutated afterwards; the query compiler, codec and executor only
//! ever see them through shared references.
//!
//! Relationships point at other descriptors by [`DescriptorId`] (an index
//! into the registry arena) rather than by ownership, which lets cyclic
//! type graphs exist without reference cycles.

pub mod field;
pub mod object;

use derive_more::Display;

///
/// DescriptorId
/// Stable arena index of a published descriptor.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("#{_0}")]
pub struct DescriptorId(u32);

impl DescriptorId {
    pub(crate) const fn new(index: usize) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self(index as u32)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}
