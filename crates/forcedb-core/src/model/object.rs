use crate::model::{DescriptorId, field::FieldDescriptor};
use forcedb_schema::node::TypeToken;
use std::collections::HashMap;

///
/// ObjectDescriptor
///
/// Immutable runtime metadata for one record type. Published by the
/// registry exactly once per type and shared by reference afterwards.
///

#[derive(Debug)]
pub struct ObjectDescriptor {
    pub(crate) id: DescriptorId,

    /// Wire identifier of the remote object type.
    pub(crate) name: &'static str,

    /// Backing Rust type.
    pub(crate) token: TypeToken,

    pub(crate) metadata_aware: bool,

    /// Declared field order (authoritative for expansion).
    pub(crate) fields: Vec<FieldDescriptor>,
    pub(crate) by_name: HashMap<&'static str, usize>,
    pub(crate) id_field: Option<usize>,
    pub(crate) attributes_field: Option<usize>,
}

impl ObjectDescriptor {
    #[must_use]
    pub const fn id(&self) -> DescriptorId {
        self.id
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn token(&self) -> TypeToken {
        self.token
    }

    /// Writes carry the type metadata object even at the top level.
    #[must_use]
    pub const fn is_metadata_aware(&self) -> bool {
        self.metadata_aware || self.attributes_field.is_some()
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&index| &self.fields[index])
    }

    #[must_use]
    pub fn id_field(&self) -> Option<&FieldDescriptor> {
        self.id_field.map(|index| &self.fields[index])
    }

    #[must_use]
    pub fn attributes_field(&self) -> Option<&FieldDescriptor> {
        self.attributes_field.map(|index| &self.fields[index])
    }

    /// Fields in expansion order: attributes, id and `Name` first, then the
    /// remaining fields in declared order.
    #[must_use]
    pub fn ordered_fields(&self) -> Vec<&FieldDescriptor> {
        let priority = |field: &FieldDescriptor| {
            if field.is_attributes() {
                0
            } else if field.is_id() {
                1
            } else if field.name().eq_ignore_ascii_case("name") {
                2
            } else {
                3
            }
        };

        let mut ordered = self.fields.iter().collect::<Vec<_>>();
        ordered.sort_by_key(|field| priority(field));

        ordered
    }
}
