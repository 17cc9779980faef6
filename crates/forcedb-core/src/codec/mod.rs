//! Descriptor-driven payload codec.
//!
//! Records are serialized with serde first; the codec then rewrites the
//! resulting JSON tree against the type's descriptor. Writes are filtered
//! per [`WriteIntent`] and relationships are collapsed to foreign-key
//! references or expanded to nested objects. Reads unwrap subquery
//! envelopes, pick concrete polymorphic types by discriminator, and turn
//! bare foreign keys into id-only stubs.

mod decode;
mod encode;
pub mod wire;


pub use wire::{
    ATTRIBUTES_KEY, Attributes, BatchEnvelope, BatchResponse, BatchResult, BatchSubRequest,
    CreateResult, QueryEnvelope, QueryResult, UpsertResult,
};

use crate::{
    error::Error,
    model::{field::FieldDescriptor, object::ObjectDescriptor},
    registry::Registry,
    traits::Record,
};
use derive_more::Display;
use serde_json::{Map, Value};
use std::sync::Arc;

///
/// WriteIntent
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum WriteIntent {
    /// Insertable fields only; nulls omitted.
    Create,

    /// Updatable fields only; nulls omitted (sparse).
    Patch,

    /// Updatable fields only; absent and null values are sent as `null`.
    Update,
}

impl WriteIntent {
    #[must_use]
    pub const fn forces_nulls(self) -> bool {
        matches!(self, Self::Update)
    }
}

///
/// Codec
///

#[derive(Clone, Copy)]
pub struct Codec<'a> {
    registry: &'a Registry,
}

impl<'a> Codec<'a> {
    #[must_use]
    pub const fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Encode a typed record for the given write intent.
    pub fn encode<T: Record>(&self, record: &T, intent: WriteIntent) -> Result<Value, Error> {
        let descriptor = self.registry.descriptor_of::<T>()?;

        self.encode_value(&descriptor, serde_json::to_value(record)?, intent)
    }

    /// Decode a wire object into a typed record.
    pub fn decode<T: Record>(&self, value: Value) -> Result<T, Error> {
        let descriptor = self.registry.descriptor_of::<T>()?;
        let value = self.decode_value(&descriptor, value)?;

        Ok(serde_json::from_value(value)?)
    }

    /// Decode a top-level query page. The envelope itself is consumed here;
    /// only the rows go through record decoding.
    pub fn decode_query<T: Record>(&self, envelope: QueryEnvelope) -> Result<QueryResult<T>, Error> {
        let records = envelope
            .records
            .into_iter()
            .map(|row| self.decode::<T>(row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QueryResult {
            total_size: envelope.total_size,
            done: envelope.done,
            records,
            next_records_url: envelope.next_records_url,
        })
    }

    /// Populated id of a typed record, if any.
    pub fn record_id<T: Record>(&self, record: &T) -> Result<Option<String>, Error> {
        let descriptor = self.registry.descriptor_of::<T>()?;
        let value = serde_json::to_value(record)?;

        Ok(value
            .as_object()
            .and_then(|object| id_of(&descriptor, object))
            .map(str::to_string))
    }

    // Concrete target of a relationship value. Polymorphic values are
    // resolved from their enum tag, then the discriminator, then the default.
    fn target_of(
        &self,
        field: &FieldDescriptor,
        discriminator: Option<&str>,
    ) -> Result<Arc<ObjectDescriptor>, Error> {
        if field.is_polymorphic()
            && let Some(target) = discriminator.and_then(|name| self.member(field, name))
        {
            return Ok(target);
        }

        self.registry.related(field).ok_or_else(|| {
            Error::codec(format!(
                "cannot determine the concrete type of relationship '{}'",
                field.name()
            ))
        })
    }

    // A declared alternative (or the default) of a polymorphic field.
    fn member(&self, field: &FieldDescriptor, name: &str) -> Option<Arc<ObjectDescriptor>> {
        self.registry.by_name(name).filter(|descriptor| {
            field.alternatives().contains(&descriptor.id()) || field.related() == Some(descriptor.id())
        })
    }
}

/// Non-empty id of an encoded or decoded record object.
pub(crate) fn id_of<'v>(
    descriptor: &ObjectDescriptor,
    object: &'v Map<String, Value>,
) -> Option<&'v str> {
    let field = descriptor.id_field()?;

    object
        .get(field.name())
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}
