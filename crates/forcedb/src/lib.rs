//! ## Crate layout
//! - `core`: descriptor registry, query compiler, codec and batched executor.
//! - `schema`: declarative record schemas and their validation.
//!
//! The `prelude` module carries what record definitions and calling code
//! need: the schema builders, the session surface and the serde derives.

pub use forcedb_core as core;
pub use forcedb_schema as schema;

/// re-exports
///
/// record definitions derive serde and build JSON fixtures without naming
/// these crates in their own manifest
pub mod __reexports {
    pub use serde;
    pub use serde_json;
}

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use core::{Error, error::ErrorKind};

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        codec::{Attributes, CreateResult, QueryResult, UpsertResult},
        config::{ClientConfig, MappingConfig, NamingConvention},
        executor::Operation,
        query::CompileOptions,
        session::{Batch, Session},
        traits::{Mapped, Record},
        transport::{Method, Transport, WireResponse},
    };
    pub use crate::schema::node::{FieldSchema, TypeSchema, TypeToken};
    pub use serde::{Deserialize, Serialize};
}
