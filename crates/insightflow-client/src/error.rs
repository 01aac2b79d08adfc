use thiserror::Error;

/// Errors returned by the insight fetch client.
#[derive(Debug, Error)]
pub enum InsightError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request exceeded the configured deadline.
    #[error("request timed out: {url}")]
    Timeout { url: String },

    /// The backend responded with a non-2xx status. The message is the
    /// `detail` field of the error body when present.
    #[error("insight API error: {0}")]
    Api(String),

    /// A 2xx response body could not be parsed as JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
