use serde::{Deserialize, Serialize};

/// Protocol-imposed cap on sub-requests per batch round trip.
pub const MAX_BATCH_REQUESTS: usize = 25;

/// Default relationship traversal depth for wildcard expansion.
pub const DEFAULT_DEPTH: usize = 5;

/// First API version that accepts the batch envelope.
pub const MIN_BATCH_API_VERSION: f32 = 34.0;

///
/// MappingConfig
///
/// Identity of a registry. Descriptors depend on these options, so one
/// registry exists per distinct value and is shared by every caller using it.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(default)]
pub struct MappingConfig {
    pub naming: NamingConvention,

    /// Strip server-maintained audit columns from every write payload.
    pub protect_audit_fields: bool,
}

impl MappingConfig {
    #[must_use]
    pub const fn protecting_audit_fields(mut self) -> Self {
        self.protect_audit_fields = true;
        self
    }
}

///
/// NamingConvention
///
/// How a relationship field name is turned into its foreign-key column name.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// `Owner` -> `OwnerId`
    #[default]
    Standard,

    /// `Parent__r` -> `Parent__c`; names without the `__r` suffix fall back to `Standard`.
    Custom,

    /// `Owner` -> `Owner<suffix>`
    Suffix(String),
}

impl NamingConvention {
    /// Foreign-key column name for a relationship field.
    #[must_use]
    pub fn reference_key(&self, relationship: &str) -> String {
        match self {
            Self::Standard => format!("{relationship}Id"),
            Self::Custom => match relationship.strip_suffix("__r") {
                Some(stem) => format!("{stem}__c"),
                None => format!("{relationship}Id"),
            },
            Self::Suffix(suffix) => format!("{relationship}{suffix}"),
        }
    }
}

///
/// ClientConfig
///
/// Execution options for one session.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Remote API version, e.g. `"58.0"`.
    pub api_version: String,

    /// Fail every later round trip once one round trip fails.
    pub halt_on_error: bool,

    /// Sub-requests per round trip; clamped to [`MAX_BATCH_REQUESTS`].
    pub batch_limit: usize,

    /// Use the batch envelope when more than one operation is submitted.
    pub batching: bool,

    /// Relationship depth for wildcard expansion.
    pub default_depth: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_version: "58.0".to_string(),
            halt_on_error: false,
            batch_limit: MAX_BATCH_REQUESTS,
            batching: true,
            default_depth: DEFAULT_DEPTH,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn effective_batch_limit(&self) -> usize {
        self.batch_limit.clamp(1, MAX_BATCH_REQUESTS)
    }

    /// Batching is available when enabled and the API version accepts it.
    #[must_use]
    pub fn supports_batching(&self) -> bool {
        self.batching
            && self
                .api_version
                .parse::<f32>()
                .is_ok_and(|version| version >= MIN_BATCH_API_VERSION)
    }
}
