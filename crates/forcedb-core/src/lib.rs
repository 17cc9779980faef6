//! Core runtime for forcedb: descriptor registry, query template compiler,
//! payload codec, and the batched operation executor.
//!
//! Control flow for one call: the registry resolves the record type into a
//! descriptor, the compiler expands any query template, the codec encodes
//! the payload, the executor sends it (alone or batched) and the codec
//! decodes the reply into the operation's result.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod codec;
pub mod config;
pub mod error;
pub mod executor;
pub mod model;
pub mod query;
pub mod registry;
pub mod session;
pub mod traits;
pub mod transport;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::Error;

///
/// Prelude
///
/// Domain vocabulary only: record traits, the session surface and result
/// types. Errors and internals are reached through their modules.
///

pub mod prelude {
    pub use crate::{
        codec::{Attributes, CreateResult, QueryResult, UpsertResult},
        config::{ClientConfig, MappingConfig, NamingConvention},
        executor::Operation,
        query::CompileOptions,
        session::{Batch, Session},
        traits::{Mapped, Record},
    };
}
