use super::{
    paths::RestPaths,
    request::{PendingOperation, Reply, ResponseContext, SubRequest},
};
use crate::{
    codec::{BatchEnvelope, BatchResponse, BatchSubRequest},
    config::ClientConfig,
    error::{Error, TransportError},
    transport::{Method, Transport},
};
use std::sync::Arc;
use tracing::{debug, trace, warn};

///
/// Executor
///
/// Sends queued operations and completes each exactly once.
///
/// A lone operation (or any operation when batching is unavailable) is
/// issued directly. Otherwise operations are packed into batch envelopes of
/// at most the configured limit; every envelope is serialized before the
/// first one is sent, and results are matched to operations purely by
/// position.
///

pub struct Executor {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    paths: RestPaths,
}

impl Executor {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        let paths = RestPaths::new(&config.api_version);

        Self {
            transport,
            config,
            paths,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub const fn paths(&self) -> &RestPaths {
        &self.paths
    }

    pub(crate) fn execute(&self, operations: Vec<Box<dyn PendingOperation>>) {
        if operations.is_empty() {
            return;
        }

        if operations.len() == 1 || !self.config.supports_batching() {
            self.execute_direct(operations);
        } else {
            self.execute_batched(operations);
        }

        if let Err(err) = self.transport.wait_outstanding() {
            warn!(error = %err, "waiting for outstanding requests failed");
        }
    }

    fn execute_direct(&self, operations: Vec<Box<dyn PendingOperation>>) {
        let context = ResponseContext {
            transport: self.transport.as_ref(),
            batched: false,
        };
        let mut halted: Option<Error> = None;

        for (round_trip, operation) in operations.into_iter().enumerate() {
            if let Some(err) = &halted {
                trace!(round_trip, "halted, failing operation without sending");
                operation.fail(err.clone());
                continue;
            }

            let request = operation.request();
            debug!(round_trip, method = %request.method, url = %request.url, batched = false, "round trip");

            match self.send_direct(request) {
                Ok(reply) => operation.complete(&context, reply),
                Err(err) => {
                    warn!(round_trip, error = %err, "direct request failed");
                    if self.config.halt_on_error {
                        halted = Some(err.clone());
                    }
                    operation.fail(err);
                }
            }
        }
    }

    fn send_direct(&self, request: &SubRequest) -> Result<Reply, Error> {
        let body = request.body.as_ref().map(serde_json::to_vec).transpose()?;
        let response = self
            .transport
            .send(request.method, &request.url, body.as_deref())?;

        Ok(Reply::from_wire(&response)?)
    }

    fn execute_batched(&self, operations: Vec<Box<dyn PendingOperation>>) {
        let limit = self.config.effective_batch_limit();

        // serialize every envelope before any I/O
        let mut chunks = Vec::with_capacity(operations.len().div_ceil(limit));
        let mut operations = operations.into_iter().peekable();
        while operations.peek().is_some() {
            let chunk = operations.by_ref().take(limit).collect::<Vec<_>>();
            let payload = self.envelope(&chunk);
            chunks.push((chunk, payload));
        }

        let context = ResponseContext {
            transport: self.transport.as_ref(),
            batched: true,
        };
        let path = self.paths.batch();
        let mut halted: Option<Error> = None;

        for (round_trip, (chunk, payload)) in chunks.into_iter().enumerate() {
            if let Some(err) = &halted {
                trace!(round_trip, ops = chunk.len(), "halted, failing round trip without sending");
                fail_all(chunk, err);
                continue;
            }
            debug!(round_trip, ops = chunk.len(), batched = true, "round trip");

            let outcome = payload.and_then(|bytes| self.send_batch(&path, &bytes, chunk.len()));
            match outcome {
                Ok(response) => {
                    for (operation, result) in chunk.into_iter().zip(response.results) {
                        let reply = Reply {
                            status: result.status_code,
                            body: result.result,
                        };
                        operation.complete(&context, reply);
                    }
                }
                Err(err) => {
                    warn!(round_trip, ops = chunk.len(), error = %err, "round trip failed");
                    if self.config.halt_on_error {
                        halted = Some(err.clone());
                    }
                    fail_all(chunk, &err);
                }
            }
        }
    }

    fn envelope(&self, chunk: &[Box<dyn PendingOperation>]) -> Result<Vec<u8>, Error> {
        let envelope = BatchEnvelope {
            halt_on_error: self.config.halt_on_error,
            batch_requests: chunk
                .iter()
                .map(|operation| {
                    let request = operation.request();
                    BatchSubRequest {
                        url: request.url.clone(),
                        method: request.method,
                        rich_input: request.body.clone(),
                    }
                })
                .collect(),
        };

        Ok(serde_json::to_vec(&envelope)?)
    }

    fn send_batch(&self, path: &str, payload: &[u8], expected: usize) -> Result<BatchResponse, Error> {
        let response = self.transport.send(Method::Post, path, Some(payload))?;
        let reply = Reply::from_wire(&response)?;
        let body = reply.into_body(None)?.unwrap_or_default();

        let response = serde_json::from_value::<BatchResponse>(body)
            .map_err(|err| TransportError::new(format!("malformed batch response: {err}")))?;
        if response.results.len() != expected {
            return Err(Error::BatchProtocolViolation(format!(
                "sent {expected} sub-requests, received {} results",
                response.results.len()
            )));
        }

        Ok(response)
    }
}

fn fail_all(chunk: Vec<Box<dyn PendingOperation>>, err: &Error) {
    for operation in chunk {
        operation.fail(err.clone());
    }
}
