use super::{Published, Slot};
use crate::{
    config::MappingConfig,
    error::Error,
    model::{
        DescriptorId,
        field::{AUDIT_FIELDS, ElementKind, FieldDescriptor, FieldRole},
        object::ObjectDescriptor,
    },
};
use forcedb_schema::{
    node::{FieldSchema, FieldShape, TokenShape, TypeSchema, TypeToken},
    validate::validate_type,
};
use std::{any::TypeId, collections::HashMap, sync::Arc};
use tracing::{debug, trace, warn};

///
/// Construction
///
/// Transient state of one outermost build. Every type reached from the root
/// gets its id reserved in `pending` before its fields are visited, so a
/// type that refers back to itself (directly or through others) resolves to
/// the id being built instead of recursing again.
///

pub(super) struct Construction<'a> {
    config: &'a MappingConfig,
    base: &'a Published,
    pending: HashMap<TypeId, DescriptorId>,
    built: Vec<Option<ObjectDescriptor>>,
    ineligible: Vec<TypeId>,
    root: Option<&'static str>,
}

impl<'a> Construction<'a> {
    pub(super) fn new(config: &'a MappingConfig, base: &'a Published) -> Self {
        Self {
            config,
            base,
            pending: HashMap::new(),
            built: Vec::new(),
            ineligible: Vec::new(),
            root: None,
        }
    }

    /// Resolve a token to a descriptor id, building it when needed.
    pub(super) fn resolve(&mut self, token: TypeToken) -> Result<Option<DescriptorId>, Error> {
        let type_id = token.type_id();

        match self.base.slot(type_id) {
            Some(Slot::Mapped(id)) => return Ok(Some(id)),
            Some(Slot::Ineligible) => return Ok(None),
            None => {}
        }
        if let Some(id) = self.pending.get(&type_id) {
            return Ok(Some(*id));
        }
        if self.ineligible.contains(&type_id) {
            return Ok(None);
        }

        let TokenShape::Mapped(schema_fn) = token.shape() else {
            trace!(ty = token.type_name(), "ineligible type, caching negative result");
            self.ineligible.push(type_id);
            return Ok(None);
        };

        let schema = schema_fn();
        if !schema.mapped {
            trace!(ty = token.type_name(), "unmarked schema, caching negative result");
            self.ineligible.push(type_id);
            return Ok(None);
        }

        self.build(token, &schema).map(Some)
    }

    fn build(&mut self, token: TypeToken, schema: &TypeSchema) -> Result<DescriptorId, Error> {
        validate_type(schema)?;
        self.root.get_or_insert(schema.name);

        // publish the id before recursing into fields
        let id = DescriptorId::new(self.base.arena.len() + self.built.len());
        self.pending.insert(token.type_id(), id);
        self.built.push(None);

        let mut fields = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            fields.push(self.build_field(schema, field)?);
        }

        let by_name = fields
            .iter()
            .enumerate()
            .map(|(index, field): (usize, &FieldDescriptor)| (field.name, index))
            .collect();
        let id_field = fields.iter().position(FieldDescriptor::is_id);
        let attributes_field = fields.iter().position(FieldDescriptor::is_attributes);

        let descriptor = ObjectDescriptor {
            id,
            name: schema.name,
            token,
            metadata_aware: schema.metadata_aware,
            fields,
            by_name,
            id_field,
            attributes_field,
        };
        self.built[id.index() - self.base.arena.len()] = Some(descriptor);

        Ok(id)
    }

    fn build_field(
        &mut self,
        owner: &TypeSchema,
        field: &FieldSchema,
    ) -> Result<FieldDescriptor, Error> {
        let role = if field.is_id {
            FieldRole::Id
        } else if field.is_attributes {
            FieldRole::Attributes
        } else {
            FieldRole::Value
        };

        let (kind, related, alternatives) = match &field.shape {
            FieldShape::Simple => (ElementKind::Simple, None, Vec::new()),
            FieldShape::Reference(target) => {
                let related = self.require(owner, field, *target)?;
                (ElementKind::Relationship, Some(related), Vec::new())
            }
            // scalar element types are plain array values, not child relationships
            FieldShape::Collection(element) => {
                (ElementKind::Collection, self.resolve(*element)?, Vec::new())
            }
            FieldShape::Polymorphic {
                alternatives,
                default,
            } => {
                let mut resolved = Vec::with_capacity(alternatives.len());
                for token in alternatives {
                    resolved.push(self.require(owner, field, *token)?);
                }
                let default = match default {
                    Some(token) => Some(self.require(owner, field, *token)?),
                    None => None,
                };
                (ElementKind::Relationship, default, resolved)
            }
        };

        let reference_key = (kind == ElementKind::Relationship)
            .then(|| self.config.naming.reference_key(field.name));

        Ok(FieldDescriptor {
            name: field.name,
            kind,
            role,
            related,
            alternatives,
            insertable: field.insertable,
            updatable: field.updatable,
            audit: field.audit || AUDIT_FIELDS.contains(&field.name),
            reference_key,
        })
    }

    // Relationship targets must map; a scalar target is a schema mistake.
    fn require(
        &mut self,
        owner: &TypeSchema,
        field: &FieldSchema,
        token: TypeToken,
    ) -> Result<DescriptorId, Error> {
        self.resolve(token)?.ok_or_else(|| {
            Error::unmappable(
                owner.name,
                format!(
                    "field '{}' targets '{}', which is not a mapped type",
                    field.name,
                    token.type_name()
                ),
            )
        })
    }

    /// Merge everything built into a new snapshot.
    pub(super) fn finish(self) -> Published {
        let mut next = self.base.clone();

        for type_id in self.ineligible {
            next.by_type.insert(type_id, Slot::Ineligible);
        }

        let count = self.built.len();
        for descriptor in self.built.into_iter().flatten() {
            let id = descriptor.id;
            next.by_type.insert(descriptor.token.type_id(), Slot::Mapped(id));

            if let Some(existing) = next.by_name.get(descriptor.name) {
                warn!(
                    name = descriptor.name,
                    existing = %existing,
                    ty = descriptor.token.type_name(),
                    "duplicate wire type name, keeping first registration"
                );
            } else {
                next.by_name.insert(descriptor.name, id);
            }

            next.arena.push(Arc::new(descriptor));
        }

        if count > 0 {
            debug!(
                root = self.root.unwrap_or_default(),
                published = count,
                total = next.arena.len(),
                "published descriptor closure"
            );
        }

        next
    }
}
