use crate::node::TypeToken;

///
/// FieldSchema
///
/// One declared field. The recognised options are the wire name, the
/// insertable/updatable flags, the id and attributes roles, the audit flag,
/// and (through [`FieldShape`]) the relationship target or polymorphic
/// alternatives.
///

#[derive(Clone, Debug)]
pub struct FieldSchema {
    pub name: &'static str,
    pub shape: FieldShape,
    pub insertable: bool,
    pub updatable: bool,
    pub is_id: bool,
    pub is_attributes: bool,
    pub audit: bool,
}

impl FieldSchema {
    const fn new(name: &'static str, shape: FieldShape) -> Self {
        Self {
            name,
            shape,
            insertable: true,
            updatable: true,
            is_id: false,
            is_attributes: false,
            audit: false,
        }
    }

    /// Plain scalar (or scalar array) value.
    #[must_use]
    pub const fn simple(name: &'static str) -> Self {
        Self::new(name, FieldShape::Simple)
    }

    /// Record identifier. Travels in the URL, never in write bodies.
    #[must_use]
    pub const fn id(name: &'static str) -> Self {
        let mut field = Self::new(name, FieldShape::Simple);
        field.is_id = true;
        field.insertable = false;
        field.updatable = false;
        field
    }

    /// Reserved per-record metadata (`{"type": .., "url": ..}`).
    #[must_use]
    pub const fn attributes(name: &'static str) -> Self {
        let mut field = Self::new(name, FieldShape::Simple);
        field.is_attributes = true;
        field.insertable = false;
        field.updatable = false;
        field
    }

    /// Single-valued relationship to another mapped type.
    #[must_use]
    pub const fn reference(name: &'static str, target: TypeToken) -> Self {
        Self::new(name, FieldShape::Reference(target))
    }

    /// Multi-valued field. With a mapped element type this is a child
    /// relationship, read through subqueries and never written; scalar
    /// elements make it a plain array value.
    #[must_use]
    pub const fn collection(name: &'static str, element: TypeToken) -> Self {
        Self::new(name, FieldShape::Collection(element))
    }

    /// Relationship whose concrete type is one of a closed set.
    #[must_use]
    pub fn polymorphic(name: &'static str, alternatives: impl IntoIterator<Item = TypeToken>) -> Self {
        Self::new(
            name,
            FieldShape::Polymorphic {
                alternatives: alternatives.into_iter().collect(),
                default: None,
            },
        )
    }

    //
    // modifiers
    //

    /// Fallback type for a polymorphic field. Has no effect on other shapes.
    #[must_use]
    pub fn default_to(mut self, token: TypeToken) -> Self {
        if let FieldShape::Polymorphic { default, .. } = &mut self.shape {
            *default = Some(token);
        }
        self
    }

    #[must_use]
    pub const fn insertable(mut self, insertable: bool) -> Self {
        self.insertable = insertable;
        self
    }

    #[must_use]
    pub const fn updatable(mut self, updatable: bool) -> Self {
        self.updatable = updatable;
        self
    }

    #[must_use]
    pub const fn read_only(self) -> Self {
        self.insertable(false).updatable(false)
    }

    /// Server-maintained audit column (created/modified stamps).
    #[must_use]
    pub const fn audit(mut self) -> Self {
        self.audit = true;
        self
    }
}

///
/// FieldShape
///

#[derive(Clone, Debug)]
pub enum FieldShape {
    Simple,
    Reference(TypeToken),
    Collection(TypeToken),
    Polymorphic {
        alternatives: Vec<TypeToken>,
        default: Option<TypeToken>,
    },
}
