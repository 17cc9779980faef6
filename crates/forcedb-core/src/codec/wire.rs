//! Wire contracts. Field names and shapes here are fixed by the remote
//! protocol and must not drift.

use crate::{error::ServerError, model::object::ObjectDescriptor, transport::Method};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved key of the per-record metadata object.
pub const ATTRIBUTES_KEY: &str = "attributes";

///
/// Attributes
///
/// Per-record metadata: the record's type name and, on reads, its URL.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Attributes {
    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Attributes {
    #[must_use]
    pub fn for_descriptor(descriptor: &ObjectDescriptor) -> Self {
        Self {
            type_name: descriptor.name().to_string(),
            url: None,
        }
    }

    /// Read the discriminator out of a wire object, if present.
    #[must_use]
    pub fn type_of(object: &Map<String, Value>) -> Option<&str> {
        object.get(ATTRIBUTES_KEY)?.get("type")?.as_str()
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".to_string(), Value::String(self.type_name.clone()));
        if let Some(url) = &self.url {
            map.insert("url".to_string(), Value::String(url.clone()));
        }

        Value::Object(map)
    }
}

///
/// QueryEnvelope
/// Raw query result page (also the shape of nested subquery results).
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryEnvelope {
    #[serde(default)]
    pub total_size: u64,

    #[serde(default)]
    pub done: bool,

    #[serde(default)]
    pub records: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_records_url: Option<String>,
}

///
/// QueryResult
/// Decoded query result.
///

#[derive(Clone, Debug, PartialEq)]
pub struct QueryResult<T> {
    pub total_size: u64,
    pub done: bool,
    pub records: Vec<T>,
    pub next_records_url: Option<String>,
}

impl<T> QueryResult<T> {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

///
/// BatchEnvelope
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEnvelope {
    pub halt_on_error: bool,
    pub batch_requests: Vec<BatchSubRequest>,
}

///
/// BatchSubRequest
///

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSubRequest {
    pub url: String,
    pub method: Method,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich_input: Option<Value>,
}

///
/// BatchResponse
/// Results arrive in submission order; unknown keys are ignored.
///

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub results: Vec<BatchResult>,
}

///
/// BatchResult
///

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub status_code: u16,

    #[serde(default)]
    pub result: Option<Value>,
}

///
/// CreateResult
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CreateResult {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub errors: Vec<ServerError>,
}

///
/// UpsertResult
/// `created` is false when an existing record was updated.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct UpsertResult {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub created: bool,
}
