//! Declarative record schemas for forcedb.
//!
//! Application code describes each record shape once, through the builder
//! methods on [`node::TypeSchema`] and [`node::FieldSchema`]. The core
//! registry consumes these nodes exactly once per type and turns them into
//! immutable runtime descriptors.
//!
//! In general:
//! - `forcedb-schema` defines *what exists*
//! - `forcedb-core::model` defines *what runs*

pub mod error;
pub mod node;
pub mod validate;

/// Maximum length for record type wire names.
pub const MAX_TYPE_NAME_LEN: usize = 80;

/// Maximum length for field wire names.
pub const MAX_FIELD_NAME_LEN: usize = 80;

use crate::error::ErrorTree;
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        err,
        error::ErrorTree,
        node::{FieldSchema, FieldShape, Mapped, TokenShape, TypeSchema, TypeToken},
    };
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("schema validation failed for '{type_name}': {errors}")]
    Validation {
        type_name: &'static str,
        errors: ErrorTree,
    },
}
