use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Runtime error for descriptor construction, query compilation, payload
/// encoding and operation execution. Cloneable so one failed round trip can
/// be delivered to every operation that rode on it.
///

#[derive(Clone, Debug, ThisError)]
#[remain::sorted]
pub enum Error {
    #[error("batch protocol violation: {0}")]
    BatchProtocolViolation(String),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("operation read before completion")]
    Incomplete,

    #[error("query compile error: {0}")]
    QueryCompile(String),

    #[error("record not found: {0}")]
    RecordNotFound(String),

    #[error("{}", render_server_errors(*.status, .errors))]
    RemoteRequest {
        status: u16,
        errors: Vec<ServerError>,
    },

    #[error("too many rows: {0}")]
    TooManyRows(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("unauthorized: {}", render_server_errors(401, .0))]
    Unauthorized(Vec<ServerError>),

    #[error("unmappable type '{type_name}': {reason}")]
    UnmappableType { type_name: String, reason: String },
}

impl Error {
    pub(crate) fn unmappable(type_name: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::UnmappableType {
            type_name: type_name.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn codec(message: impl fmt::Display) -> Self {
        Self::Codec(message.to_string())
    }

    /// Stable classification, independent of message text.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BatchProtocolViolation(_) => ErrorKind::BatchProtocolViolation,
            Self::Codec(_) => ErrorKind::Codec,
            Self::Incomplete => ErrorKind::Incomplete,
            Self::QueryCompile(_) => ErrorKind::QueryCompile,
            Self::RecordNotFound(_) => ErrorKind::RecordNotFound,
            Self::RemoteRequest { .. } => ErrorKind::RemoteRequest,
            Self::TooManyRows(_) => ErrorKind::TooManyRows,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::UnmappableType { .. } => ErrorKind::UnmappableType,
        }
    }

    /// Server-provided error entries, when the failure came from the server.
    #[must_use]
    pub fn server_errors(&self) -> &[ServerError] {
        match self {
            Self::Unauthorized(errors) | Self::RemoteRequest { errors, .. } => errors,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::codec(err)
    }
}

impl From<forcedb_schema::Error> for Error {
    fn from(err: forcedb_schema::Error) -> Self {
        match err {
            forcedb_schema::Error::Validation { type_name, errors } => {
                Self::unmappable(type_name, errors)
            }
        }
    }
}

///
/// ErrorKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum ErrorKind {
    BatchProtocolViolation,
    Codec,
    Incomplete,
    QueryCompile,
    RecordNotFound,
    RemoteRequest,
    TooManyRows,
    Transport,
    Unauthorized,
    UnmappableType,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::BatchProtocolViolation => "batch_protocol_violation",
            Self::Codec => "codec",
            Self::Incomplete => "incomplete",
            Self::QueryCompile => "query_compile",
            Self::RecordNotFound => "record_not_found",
            Self::RemoteRequest => "remote_request",
            Self::TooManyRows => "too_many_rows",
            Self::Transport => "transport",
            Self::Unauthorized => "unauthorized",
            Self::UnmappableType => "unmappable_type",
        };
        write!(f, "{label}")
    }
}

///
/// ServerError
///
/// One entry of the server's structured error list.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerError {
    #[serde(default, alias = "statusCode")]
    pub error_code: String,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub fields: Vec<String>,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_code, self.message)?;
        if !self.fields.is_empty() {
            write!(f, " (fields: {})", self.fields.join(", "))?;
        }

        Ok(())
    }
}

/// Server error entries carried by a parsed body, tolerating both the list
/// and single-object forms.
#[must_use]
pub fn server_errors_from(value: &Value) -> Vec<ServerError> {
    match value {
        Value::Array(entries) => entries
            .iter()
            .filter_map(|entry| ServerError::deserialize(entry).ok())
            .collect(),
        Value::Object(_) => ServerError::deserialize(value)
            .ok()
            .filter(|error| !(error.error_code.is_empty() && error.message.is_empty()))
            .into_iter()
            .collect(),
        _ => Vec::new(),
    }
}

// User-visible message: server entries when present, else the bare status.
fn render_server_errors(status: u16, errors: &[ServerError]) -> String {
    if errors.is_empty() {
        format!("HTTP status {status}")
    } else {
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

///
/// TransportError
///
/// Wrapped network or response-parse failure.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
