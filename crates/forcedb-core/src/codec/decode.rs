use super::{ATTRIBUTES_KEY, Attributes, Codec, QueryEnvelope};
use crate::{
    error::Error,
    model::{
        field::{ElementKind, FieldDescriptor},
        object::ObjectDescriptor,
    },
};
use serde_json::{Map, Value};

impl Codec<'_> {
    /// Rewrite one wire record into the shape its serde type expects.
    pub fn decode_value(&self, descriptor: &ObjectDescriptor, value: Value) -> Result<Value, Error> {
        match value {
            Value::Object(object) => self.decode_object(descriptor, &object).map(Value::Object),
            other => Err(Error::codec(format!(
                "expected a '{}' record object, got {other}",
                descriptor.name()
            ))),
        }
    }

    fn decode_object(
        &self,
        descriptor: &ObjectDescriptor,
        object: &Map<String, Value>,
    ) -> Result<Map<String, Value>, Error> {
        let mut out = Map::new();

        for field in descriptor.fields() {
            let name = field.name().to_string();

            if field.is_attributes() {
                if let Some(attributes) = object.get(ATTRIBUTES_KEY) {
                    out.insert(name, attributes.clone());
                }
                continue;
            }

            match field.kind() {
                ElementKind::Collection if field.is_child_relationship() => {
                    let rows = self.decode_children(field, object.get(field.name()))?;
                    out.insert(name, Value::Array(rows));
                }
                ElementKind::Simple | ElementKind::Collection => {
                    if let Some(value) = object.get(field.name()) {
                        out.insert(name, value.clone());
                    }
                }
                ElementKind::Relationship => match object.get(field.name()) {
                    Some(Value::Object(related)) => {
                        out.insert(name, self.decode_related(field, related)?);
                    }
                    Some(Value::Null) | None => {
                        if let Some(stub) = self.stub(field, object) {
                            out.insert(name, stub);
                        }
                    }
                    Some(other) => {
                        return Err(Error::codec(format!(
                            "relationship '{}.{}' holds {other}, expected an object",
                            descriptor.name(),
                            field.name()
                        )));
                    }
                },
            }
        }

        Ok(out)
    }

    // Subquery results arrive wrapped in a query envelope; plain arrays are
    // accepted too and a missing value means no children. Nested rows are
    // never paged, so a continuation is refused rather than truncated.
    fn decode_children(
        &self,
        field: &FieldDescriptor,
        value: Option<&Value>,
    ) -> Result<Vec<Value>, Error> {
        let rows = match value {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(rows)) => rows.clone(),
            Some(envelope @ Value::Object(_)) => {
                let envelope = serde_json::from_value::<QueryEnvelope>(envelope.clone())?;
                if let Some(next) = envelope.next_records_url {
                    return Err(Error::TooManyRows(format!(
                        "child relationship '{}' continues at '{next}'",
                        field.name()
                    )));
                }

                envelope.records
            }
            Some(other) => {
                return Err(Error::codec(format!(
                    "child relationship '{}' holds {other}, expected rows",
                    field.name()
                )));
            }
        };
        let element = self.registry.related(field).ok_or_else(|| {
            Error::codec(format!("child relationship '{}' has no element type", field.name()))
        })?;

        rows.into_iter()
            .map(|row| self.decode_value(&element, row))
            .collect()
    }

    fn decode_related(
        &self,
        field: &FieldDescriptor,
        related: &Map<String, Value>,
    ) -> Result<Value, Error> {
        let target = self.target_of(field, Attributes::type_of(related))?;
        let decoded = Value::Object(self.decode_object(&target, related)?);

        Ok(tag(field, &target, decoded))
    }

    // Only the foreign key came back: build an id-only record of the target.
    fn stub(&self, field: &FieldDescriptor, owner: &Map<String, Value>) -> Option<Value> {
        let id = owner.get(field.reference_key()?)?.as_str()?;
        let target = self.registry.related(field)?;
        let id_field = target.id_field()?;

        let mut object = Map::new();
        object.insert(id_field.name().to_string(), Value::String(id.to_string()));

        Some(tag(field, &target, Value::Object(object)))
    }
}

// Polymorphic values deserialize as externally tagged enums.
fn tag(field: &FieldDescriptor, target: &ObjectDescriptor, value: Value) -> Value {
    if field.is_polymorphic() {
        Value::Object(Map::from_iter([(target.name().to_string(), value)]))
    } else {
        value
    }
}
