//! Operation execution.
//!
//! Each call is planned into a [`SubRequest`] plus a single-assignment
//! [`Operation`]; the [`Executor`] then sends queued work directly or in
//! batch envelopes and completes every operation exactly once.

mod batch;
mod operation;
mod ops;
mod paths;
mod request;

#[cfg(test)]
mod tests;

pub use batch::Executor;
pub use operation::Operation;
pub use paths::RestPaths;
pub use request::{Reply, SubRequest};

pub(crate) use ops::Planner;
pub(crate) use request::PendingOperation;
