use crate::model::DescriptorId;
use derive_more::Display;

/// Server-maintained columns treated as audit fields even when not flagged.
pub const AUDIT_FIELDS: &[&str] = &[
    "CreatedById",
    "CreatedDate",
    "LastModifiedById",
    "LastModifiedDate",
    "SystemModstamp",
];

///
/// FieldDescriptor
/// Runtime field metadata used by query expansion and the codec.
///

#[derive(Debug)]
pub struct FieldDescriptor {
    pub(crate) name: &'static str,
    pub(crate) kind: ElementKind,
    pub(crate) role: FieldRole,

    /// Target descriptor; for polymorphic fields this is the default, if any.
    pub(crate) related: Option<DescriptorId>,

    /// Declared alternatives of a polymorphic field, in declaration order.
    pub(crate) alternatives: Vec<DescriptorId>,

    pub(crate) insertable: bool,
    pub(crate) updatable: bool,
    pub(crate) audit: bool,

    /// Foreign-key column name, for single-valued relationships.
    pub(crate) reference_key: Option<String>,
}

impl FieldDescriptor {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.kind
    }

    #[must_use]
    pub const fn role(&self) -> FieldRole {
        self.role
    }

    #[must_use]
    pub const fn related(&self) -> Option<DescriptorId> {
        self.related
    }

    #[must_use]
    pub fn alternatives(&self) -> &[DescriptorId] {
        &self.alternatives
    }

    #[must_use]
    pub const fn is_polymorphic(&self) -> bool {
        !self.alternatives.is_empty()
    }

    #[must_use]
    pub fn is_id(&self) -> bool {
        self.role == FieldRole::Id
    }

    #[must_use]
    pub fn is_attributes(&self) -> bool {
        self.role == FieldRole::Attributes
    }

    /// Single-valued relationship (plain or polymorphic).
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.kind == ElementKind::Relationship
    }

    /// Child relationship with a mapped element type.
    #[must_use]
    pub fn is_child_relationship(&self) -> bool {
        self.kind == ElementKind::Collection && self.related.is_some()
    }

    #[must_use]
    pub const fn insertable(&self) -> bool {
        self.insertable
    }

    #[must_use]
    pub const fn updatable(&self) -> bool {
        self.updatable
    }

    #[must_use]
    pub const fn is_audit(&self) -> bool {
        self.audit
    }

    #[must_use]
    pub fn reference_key(&self) -> Option<&str> {
        self.reference_key.as_deref()
    }
}

///
/// ElementKind
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ElementKind {
    Simple,
    Relationship,
    Collection,
}

///
/// FieldRole
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldRole {
    Value,
    Id,
    Attributes,
}
