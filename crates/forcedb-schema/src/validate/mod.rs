//! Schema validation orchestration and shared helpers.

pub mod naming;
pub mod role;


use crate::{Error, error::ErrorTree, node::TypeSchema};

/// Validate one type schema in a staged, deterministic order.
pub fn validate_type(schema: &TypeSchema) -> Result<(), Error> {
    // Phase 1: identifiers.
    let mut errors = ErrorTree::new();
    naming::validate_type_name(schema, &mut errors);
    naming::validate_field_names(schema, &mut errors);

    // Phase 2: field roles and relationship shapes.
    role::validate_roles(schema, &mut errors);
    role::validate_shapes(schema, &mut errors);

    errors.result().map_err(|errors| Error::Validation {
        type_name: schema.name,
        errors,
    })
}
