//! Transport abstraction consumed by the executor.
//!
//! The concrete HTTP adapter, authentication and timeouts live outside this
//! crate; the executor only needs verb-level calls against paths relative to
//! the data service root.

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use crate::error::TransportError;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// Method
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[display("GET")]
    Get,
    #[display("POST")]
    Post,
    #[display("PATCH")]
    Patch,
    #[display("DELETE")]
    Delete,
}

///
/// WireResponse
/// Status code plus the raw, byte-counted body.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WireResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl WireResponse {
    #[must_use]
    pub const fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

///
/// Transport
///

pub trait Transport: Send + Sync {
    /// Issue one request against a path relative to the data service root.
    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&[u8]>,
    ) -> Result<WireResponse, TransportError>;

    /// Whether `send` blocks until the response is available.
    fn is_synchronous(&self) -> bool {
        true
    }

    /// Block until every request issued so far has finished.
    fn wait_outstanding(&self) -> Result<(), TransportError> {
        Ok(())
    }
}
