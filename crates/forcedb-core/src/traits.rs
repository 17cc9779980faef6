use serde::{Serialize, de::DeserializeOwned};

pub use forcedb_schema::node::Mapped;

///
/// Record
///
/// A mapped type that can travel over the wire. Serde field names must be
/// the wire field names declared in the type's schema; relationship fields
/// hold the related record (or `None`), polymorphic fields hold an
/// externally tagged enum whose variant names are the alternatives' wire
/// type names.
///

pub trait Record: Mapped + Serialize + DeserializeOwned + Send + Sync {}

impl<T> Record for T where T: Mapped + Serialize + DeserializeOwned + Send + Sync {}
