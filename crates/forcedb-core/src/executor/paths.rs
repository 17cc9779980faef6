use url::form_urlencoded;

/// Prefix of absolute continuation URLs returned by the server.
const DATA_ROOT: &str = "/services/data/";

///
/// RestPaths
/// Request paths relative to the data service root.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RestPaths {
    version: String,
}

impl RestPaths {
    #[must_use]
    pub fn new(api_version: &str) -> Self {
        Self {
            version: format!("v{}", api_version.trim_start_matches('v')),
        }
    }

    #[must_use]
    pub fn sobject(&self, type_name: &str) -> String {
        format!("{}/sobjects/{type_name}", self.version)
    }

    #[must_use]
    pub fn record(&self, type_name: &str, id: &str) -> String {
        format!("{}/{}", self.sobject(type_name), segment(id))
    }

    #[must_use]
    pub fn external(&self, type_name: &str, field: &str, value: &str) -> String {
        format!("{}/{field}/{}", self.sobject(type_name), segment(value))
    }

    #[must_use]
    pub fn query(&self, query: &str) -> String {
        format!("{}/query?{}", self.version, encode_pair("q", query))
    }

    #[must_use]
    pub fn query_all(&self, query: &str) -> String {
        format!("{}/queryAll?{}", self.version, encode_pair("q", query))
    }

    #[must_use]
    pub fn batch(&self) -> String {
        format!("{}/composite/batch", self.version)
    }

    /// Append a form-encoded query parameter.
    #[must_use]
    pub fn with_param(path: &str, key: &str, value: &str) -> String {
        format!("{path}?{}", encode_pair(key, value))
    }

    /// Strip the data service root from a server-issued URL.
    #[must_use]
    pub fn relative(url: &str) -> &str {
        url.strip_prefix(DATA_ROOT)
            .or_else(|| url.strip_prefix('/'))
            .unwrap_or(url)
    }
}

fn encode_pair(key: &str, value: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish()
}

// form encoding writes spaces as '+', which is literal inside a path
fn segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
