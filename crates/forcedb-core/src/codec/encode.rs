use super::{ATTRIBUTES_KEY, Attributes, Codec, WriteIntent, id_of};
use crate::{
    error::Error,
    model::{
        field::{ElementKind, FieldDescriptor},
        object::ObjectDescriptor,
    },
};
use serde_json::{Map, Value};

impl Codec<'_> {
    /// Encode an already serialized record.
    ///
    /// Metadata is computed up front and handed to the object encoder, so a
    /// nested object's discriminator never depends on encoder state.
    pub fn encode_value(
        &self,
        descriptor: &ObjectDescriptor,
        value: Value,
        intent: WriteIntent,
    ) -> Result<Value, Error> {
        let Value::Object(object) = value else {
            return Err(Error::codec(format!(
                "'{}' must serialize to a JSON object",
                descriptor.name()
            )));
        };
        let attributes = descriptor
            .is_metadata_aware()
            .then(|| Attributes::for_descriptor(descriptor));

        self.encode_object(descriptor, object, intent, attributes.as_ref())
            .map(Value::Object)
    }

    fn encode_object(
        &self,
        descriptor: &ObjectDescriptor,
        mut object: Map<String, Value>,
        intent: WriteIntent,
        attributes: Option<&Attributes>,
    ) -> Result<Map<String, Value>, Error> {
        let mut out = Map::new();
        if let Some(attributes) = attributes {
            out.insert(ATTRIBUTES_KEY.to_string(), attributes.to_value());
        }

        for field in descriptor.fields() {
            if !self.writable(field, intent) {
                continue;
            }
            let value = object.remove(field.name()).unwrap_or(Value::Null);

            match field.kind() {
                ElementKind::Simple | ElementKind::Collection => {
                    if !value.is_null() {
                        out.insert(field.name().to_string(), value);
                    } else if intent.forces_nulls() {
                        out.insert(field.name().to_string(), Value::Null);
                    }
                }
                ElementKind::Relationship => {
                    self.encode_relationship(descriptor, field, value, intent, &mut out)?;
                }
            }
        }

        Ok(out)
    }

    fn encode_relationship(
        &self,
        owner: &ObjectDescriptor,
        field: &FieldDescriptor,
        value: Value,
        intent: WriteIntent,
        out: &mut Map<String, Value>,
    ) -> Result<(), Error> {
        let key = field.reference_key().unwrap_or(field.name()).to_string();

        match value {
            Value::Null => {
                if intent.forces_nulls() {
                    out.insert(key, Value::Null);
                }
            }
            Value::String(id) => {
                out.insert(key, Value::String(id));
            }
            Value::Object(object) => {
                let (tag, object) = untag(field, object);
                let discriminator = tag.or_else(|| Attributes::type_of(&object).map(str::to_string));
                let target = self.target_of(field, discriminator.as_deref())?;

                if let Some(id) = id_of(&target, &object) {
                    out.insert(key, Value::String(id.to_string()));
                } else {
                    let attributes = Attributes::for_descriptor(&target);
                    let nested =
                        self.encode_object(&target, object, WriteIntent::Create, Some(&attributes))?;
                    out.insert(field.name().to_string(), Value::Object(nested));
                }
            }
            other => {
                return Err(Error::codec(format!(
                    "relationship '{}.{}' holds {other}, expected an object or an id",
                    owner.name(),
                    field.name()
                )));
            }
        }

        Ok(())
    }

    fn writable(&self, field: &FieldDescriptor, intent: WriteIntent) -> bool {
        if field.is_attributes() || field.is_id() || field.is_child_relationship() {
            return false;
        }
        if field.is_audit() && self.registry.config().protect_audit_fields {
            return false;
        }

        match intent {
            WriteIntent::Create => field.insertable(),
            WriteIntent::Patch | WriteIntent::Update => field.updatable(),
        }
    }
}

// Polymorphic values serialize as externally tagged enums: `{"Account": {..}}`.
fn untag(
    field: &FieldDescriptor,
    object: Map<String, Value>,
) -> (Option<String>, Map<String, Value>) {
    if !field.is_polymorphic() || object.len() != 1 {
        return (None, object);
    }

    let mut entries = object.into_iter();
    match entries.next() {
        Some((tag, Value::Object(inner))) if tag != ATTRIBUTES_KEY => (Some(tag), inner),
        Some((tag, value)) => (None, Map::from_iter([(tag, value)])),
        None => (None, Map::new()),
    }
}
