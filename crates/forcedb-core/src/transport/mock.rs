use crate::{
    error::TransportError,
    transport::{Method, Transport, WireResponse},
};
use serde_json::Value;
use std::{collections::VecDeque, sync::Mutex};

///
/// RecordedRequest
///

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

///
/// ScriptedTransport
///
/// Replays queued responses in order and records every request it sees.
/// Running out of responses is reported as a transport failure.
///

pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<WireResponse, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    synchronous: bool,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedTransport {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            synchronous: true,
        }
    }

    /// A transport that reports itself as asynchronous.
    #[must_use]
    pub const fn asynchronous() -> Self {
        let mut transport = Self::new();
        transport.synchronous = false;
        transport
    }

    pub fn push_json(&self, status: u16, body: &Value) -> &Self {
        let bytes = serde_json::to_vec(body).unwrap_or_default();
        self.push(Ok(WireResponse::new(status, bytes)))
    }

    pub fn push_status(&self, status: u16) -> &Self {
        self.push(Ok(WireResponse::new(status, Vec::new())))
    }

    pub fn push_raw(&self, status: u16, body: &str) -> &Self {
        self.push(Ok(WireResponse::new(status, body.as_bytes().to_vec())))
    }

    pub fn push_failure(&self, message: &str) -> &Self {
        self.push(Err(TransportError::new(message)))
    }

    fn push(&self, response: Result<WireResponse, TransportError>) -> &Self {
        self.responses
            .lock()
            .expect("scripted responses poisoned")
            .push_back(response);
        self
    }

    /// Every request sent so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("recorded requests poisoned")
            .clone()
    }

    #[must_use]
    pub fn pending_responses(&self) -> usize {
        self.responses
            .lock()
            .expect("scripted responses poisoned")
            .len()
    }
}

impl Transport for ScriptedTransport {
    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&[u8]>,
    ) -> Result<WireResponse, TransportError> {
        let body = body
            .map(serde_json::from_slice::<Value>)
            .transpose()
            .map_err(TransportError::new)?;
        self.requests
            .lock()
            .expect("recorded requests poisoned")
            .push(RecordedRequest {
                method,
                path: path.to_string(),
                body,
            });

        self.responses
            .lock()
            .expect("scripted responses poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no scripted response left")))
    }

    fn is_synchronous(&self) -> bool {
        self.synchronous
    }
}
