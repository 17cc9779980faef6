mod field;
mod object;
mod token;

pub use field::*;
pub use object::*;
pub use token::*;

///
/// Mapped
///
/// Implemented by every record type that can be exchanged with the remote
/// store. The returned schema is consumed once, when the registry first
/// builds the type's descriptor.
///

pub trait Mapped: 'static {
    fn schema() -> TypeSchema;
}
