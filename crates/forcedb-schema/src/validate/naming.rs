use crate::{MAX_FIELD_NAME_LEN, MAX_TYPE_NAME_LEN, node::TypeSchema, prelude::*};
use std::collections::BTreeSet;

pub fn validate_type_name(schema: &TypeSchema, errs: &mut ErrorTree) {
    if let Some(problem) = identifier_problem(schema.name, MAX_TYPE_NAME_LEN) {
        err!(errs, "type name '{}' {problem}", schema.name);
    }
}

pub fn validate_field_names(schema: &TypeSchema, errs: &mut ErrorTree) {
    let mut seen = BTreeSet::new();

    for field in &schema.fields {
        if let Some(problem) = identifier_problem(field.name, MAX_FIELD_NAME_LEN) {
            errs.add_for(field.name, format!("field name {problem}"));
        }

        if !seen.insert(field.name) {
            err!(errs, "duplicate field '{}'", field.name);
        }
    }
}

// Wire identifiers are ASCII words; the remote dialect rejects anything else.
fn identifier_problem(name: &str, max_len: usize) -> Option<String> {
    if name.is_empty() {
        return Some("is empty".to_string());
    }
    if name.len() > max_len {
        return Some(format!("exceeds {max_len} characters"));
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Some("starts with a digit".to_string());
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Some("contains characters outside [A-Za-z0-9_]".to_string());
    }

    None
}
