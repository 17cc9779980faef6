use crate::node::{FieldSchema, Mapped, TypeToken};

///
/// TypeSchema
///
/// Declarative description of one record type's wire shape.
/// Field order is significant: it drives query expansion order.
///

#[derive(Clone, Debug)]
pub struct TypeSchema {
    /// Wire identifier of the remote object type.
    pub name: &'static str,

    /// Required marker; unmapped schemas describe plain values and are never
    /// turned into descriptors.
    pub mapped: bool,

    /// Record carries the reserved metadata object on every write.
    pub metadata_aware: bool,

    pub fields: Vec<FieldSchema>,
}

impl TypeSchema {
    /// Start a mapped object schema.
    #[must_use]
    pub const fn object(name: &'static str) -> Self {
        Self {
            name,
            mapped: true,
            metadata_aware: false,
            fields: Vec::new(),
        }
    }

    /// Start a schema for a value type that is not a remote object.
    #[must_use]
    pub const fn unmapped(name: &'static str) -> Self {
        Self {
            name,
            mapped: false,
            metadata_aware: false,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub const fn metadata_aware(mut self) -> Self {
        self.metadata_aware = true;
        self
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    //
    // shorthands
    //

    #[must_use]
    pub fn id(self, name: &'static str) -> Self {
        self.field(FieldSchema::id(name))
    }

    #[must_use]
    pub fn attributes(self) -> Self {
        self.field(FieldSchema::attributes("attributes"))
    }

    #[must_use]
    pub fn simple(self, name: &'static str) -> Self {
        self.field(FieldSchema::simple(name))
    }

    #[must_use]
    pub fn reference<T: Mapped>(self, name: &'static str) -> Self {
        self.field(FieldSchema::reference(name, TypeToken::of::<T>()))
    }

    #[must_use]
    pub fn children<T: Mapped>(self, name: &'static str) -> Self {
        self.field(FieldSchema::collection(name, TypeToken::of::<T>()))
    }

    //
    // lookups
    //

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn id_field(&self) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.is_id)
    }
}
