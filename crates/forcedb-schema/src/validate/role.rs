use crate::{
    node::{FieldShape, TypeSchema},
    prelude::*,
};
use std::collections::BTreeSet;

// At most one id field and one attributes field, both plain values.
pub fn validate_roles(schema: &TypeSchema, errs: &mut ErrorTree) {
    let ids = schema.fields.iter().filter(|f| f.is_id).count();
    if ids > 1 {
        err!(errs, "{ids} id fields declared, at most one allowed");
    }

    let attributes = schema.fields.iter().filter(|f| f.is_attributes).count();
    if attributes > 1 {
        err!(errs, "{attributes} attributes fields declared, at most one allowed");
    }

    for field in &schema.fields {
        if field.is_id && field.is_attributes {
            errs.add_for(field.name, "field cannot be both id and attributes");
        }
        if (field.is_id || field.is_attributes) && !matches!(field.shape, FieldShape::Simple) {
            errs.add_for(field.name, "id and attributes fields must be simple values");
        }
        if field.is_attributes && (field.insertable || field.updatable) {
            errs.add_for(field.name, "attributes field cannot be written");
        }
    }
}

pub fn validate_shapes(schema: &TypeSchema, errs: &mut ErrorTree) {
    for field in &schema.fields {
        let FieldShape::Polymorphic {
            alternatives,
            default,
        } = &field.shape
        else {
            continue;
        };

        if alternatives.is_empty() {
            errs.add_for(field.name, "polymorphic field declares no alternatives");
        }

        let mut seen = BTreeSet::new();
        for token in alternatives {
            if !seen.insert(token.type_id()) {
                errs.add_for(
                    field.name,
                    format!("alternative '{}' listed twice", token.type_name()),
                );
            }
        }

        if let Some(token) = default
            && !token.shape().is_mapped()
        {
            errs.add_for(
                field.name,
                format!("default '{}' is not a mapped type", token.type_name()),
            );
        }
    }
}
