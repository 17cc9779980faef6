use super::{operation::Completer, paths::RestPaths};
use crate::{
    codec::QueryEnvelope,
    error::{Error, TransportError, server_errors_from},
    transport::{Method, Transport, WireResponse},
};
use serde_json::Value;
use tracing::trace;

///
/// SubRequest
/// One fully serialized unit of wire work.
///

#[derive(Clone, Debug, PartialEq)]
pub struct SubRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

impl SubRequest {
    #[must_use]
    pub const fn new(method: Method, url: String, body: Option<Value>) -> Self {
        Self { method, url, body }
    }
}

///
/// Reply
/// Status and parsed body of one sub-request, batched or not.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Option<Value>,
}

impl Reply {
    /// Parse a direct response. An unparseable body is a transport failure
    /// on success only; an error status keeps its status whatever the body
    /// holds, and a body without a structured error list carries none.
    pub fn from_wire(response: &WireResponse) -> Result<Self, TransportError> {
        let body = if response.body.iter().all(u8::is_ascii_whitespace) {
            None
        } else if response.is_success() {
            Some(serde_json::from_slice(&response.body).map_err(TransportError::new)?)
        } else {
            serde_json::from_slice(&response.body).ok()
        };

        Ok(Self {
            status: response.status,
            body,
        })
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Successful body, or the error its status maps to. `missing` names the
    /// record for single fetches, where 404 means the record does not exist.
    pub fn into_body(self, missing: Option<&str>) -> Result<Option<Value>, Error> {
        if self.is_success() {
            return Ok(self.body);
        }

        let errors = self.body.as_ref().map(server_errors_from).unwrap_or_default();
        match (self.status, missing) {
            (401, _) => Err(Error::Unauthorized(errors)),
            (404, Some(record)) => Err(Error::RecordNotFound(record.to_string())),
            (status, _) => Err(Error::RemoteRequest { status, errors }),
        }
    }
}

///
/// ResponseContext
/// What an operation may do while consuming its reply.
///

pub(crate) struct ResponseContext<'a> {
    pub(crate) transport: &'a dyn Transport,
    pub(crate) batched: bool,
}

impl ResponseContext<'_> {
    /// Fetch the next query page. Only a synchronous, unbatched call can
    /// follow a continuation; anywhere else a partial result is refused.
    pub(crate) fn follow(&self, next_records_url: &str) -> Result<QueryEnvelope, Error> {
        if self.batched || !self.transport.is_synchronous() {
            return Err(Error::TooManyRows(format!(
                "result continues at '{next_records_url}' and cannot be followed here"
            )));
        }
        trace!(next = next_records_url, "following query continuation");

        let path = RestPaths::relative(next_records_url);
        let response = self.transport.send(Method::Get, path, None)?;
        let body = Reply::from_wire(&response)?.into_body(None)?.unwrap_or_default();

        Ok(serde_json::from_value(body)?)
    }
}

///
/// PendingOperation
///
/// Type-erased unit of work queued for the executor. Exactly one of
/// `complete` or `fail` is called, which consumes it.
///

pub(crate) trait PendingOperation: Send {
    fn request(&self) -> &SubRequest;

    fn complete(self: Box<Self>, context: &ResponseContext<'_>, reply: Reply);

    fn fail(self: Box<Self>, err: Error);
}

///
/// Pending
///

pub(crate) struct Pending<T, F> {
    request: SubRequest,
    completer: Completer<T>,
    handle: F,
}

impl<T, F> Pending<T, F>
where
    T: Send + Sync + 'static,
    F: FnOnce(&ResponseContext<'_>, Reply) -> Result<T, Error> + Send + 'static,
{
    pub(crate) fn boxed(
        request: SubRequest,
        completer: Completer<T>,
        handle: F,
    ) -> Box<dyn PendingOperation> {
        Box::new(Self {
            request,
            completer,
            handle,
        })
    }
}

impl<T, F> PendingOperation for Pending<T, F>
where
    T: Send + Sync,
    F: FnOnce(&ResponseContext<'_>, Reply) -> Result<T, Error> + Send,
{
    fn request(&self) -> &SubRequest {
        &self.request
    }

    fn complete(self: Box<Self>, context: &ResponseContext<'_>, reply: Reply) {
        let Self {
            completer, handle, ..
        } = *self;

        completer.complete(handle(context, reply));
    }

    fn fail(self: Box<Self>, err: Error) {
        self.completer.complete(Err(err));
    }
}
