//! HTTP client for the insight analysis backend.
//!
//! Wraps `reqwest` with insight-specific error handling and hands every
//! successful response body to the normalizer. One request per invocation,
//! no retries — retry is a caller-level decision.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;

use crate::error::InsightError;
use crate::normalize::normalize;
use crate::types::{InsightParams, InsightResultSet};

const RUN_FLOW_PATH: &str = "run-flow";
const API_ERROR_FALLBACK: &str = "Failed to run insight flow";

/// Wire shape of the `/run-flow` request body.
#[derive(Debug, Serialize)]
struct RunFlowRequest<'a> {
    platforms: &'a [String],
    preset: &'a str,
    tone: &'a str,
    #[serde(rename = "dateRange")]
    date_range: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    keywords: Option<&'a [String]>,
}

impl<'a> From<&'a InsightParams> for RunFlowRequest<'a> {
    fn from(params: &'a InsightParams) -> Self {
        Self {
            platforms: &params.platforms,
            preset: &params.preset,
            tone: &params.tone,
            date_range: &params.date_range,
            keywords: params.keywords.as_deref(),
        }
    }
}

/// Client for the insight analysis backend.
///
/// Holds the HTTP client and base URL. The base URL is injected at
/// construction (never read ambiently), so tests can point it at a mock
/// server.
pub struct InsightClient {
    client: Client,
    base_url: Url,
}

impl InsightClient {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`InsightError::Api`] if `base_url` is not
    /// a valid URL.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, InsightError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("insightflow/0.1 (insight-dashboard)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join appends the flow path rather than replacing the last path
        // segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| InsightError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Runs one insight flow and returns the normalized result.
    ///
    /// Sends a single POST to `{base}/run-flow` with the JSON-encoded
    /// parameters, then hands the response body to
    /// [`normalize`](crate::normalize).
    ///
    /// # Errors
    ///
    /// - [`InsightError::Api`] on a non-2xx status; the message is the
    ///   error body's `detail` field when present, otherwise a fixed
    ///   fallback string.
    /// - [`InsightError::Timeout`] when the configured deadline elapses.
    /// - [`InsightError::Http`] on any other network failure.
    /// - [`InsightError::Deserialize`] if a 2xx body is not valid JSON.
    pub async fn run_flow(
        &self,
        params: &InsightParams,
    ) -> Result<InsightResultSet, InsightError> {
        let url = self.run_flow_url();
        let body = RunFlowRequest::from(params);
        tracing::debug!(url = %url, platforms = ?params.platforms, "running insight flow");

        let response = self
            .client
            .post(url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| classify(e, &url))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| classify(e, &url))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| {
                    v.get("detail")
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_owned)
                });
            tracing::warn!(status = %status, "insight flow request rejected");
            return Err(InsightError::Api(
                detail.unwrap_or_else(|| API_ERROR_FALLBACK.to_string()),
            ));
        }

        let raw: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| InsightError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        Ok(normalize(&raw))
    }

    fn run_flow_url(&self) -> Url {
        // The base URL always ends in a slash, so join cannot fail here.
        self.base_url
            .join(RUN_FLOW_PATH)
            .unwrap_or_else(|_| self.base_url.clone())
    }
}

/// Distinguishes deadline expiry from other transport failures.
fn classify(e: reqwest::Error, url: &Url) -> InsightError {
    if e.is_timeout() {
        InsightError::Timeout {
            url: url.to_string(),
        }
    } else {
        InsightError::Http(e)
    }
}
