//! Domain types for normalized insight data.
//!
//! These are the fixed shapes consumed by presentation layers. They serialize
//! to the camel-cased JSON contract the dashboard frontend expects, so a
//! serialized [`InsightResultSet`] can be fed straight to a UI.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tri-state sentiment classification.
///
/// Parsing is case-insensitive; anything unrecognised (or absent) collapses
/// to [`Sentiment::Neutral`] rather than erroring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    /// Maps a raw backend sentiment string to a variant.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("positive") => Self::Positive,
            Some("negative") => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Neutral => write!(f, "neutral"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

/// One analyzed observation, either mapped from a backend payload item or
/// synthesized client-side as a liveness filler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// Opaque token, freshly generated per normalization pass (see
    /// [`crate::random_token`]). Never derived from input.
    pub id: String,
    pub title: String,
    pub description: String,
    pub sentiment: Sentiment,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

/// A representative content excerpt for one platform. The normalizer emits
/// exactly one bundle per platform, summarizing that platform's insights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformPost {
    #[serde(rename = "post_title")]
    pub title: String,
    #[serde(rename = "post_link", skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub content_lines: Vec<String>,
}

/// One slice of a sentiment breakdown, with its display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentSlice {
    pub name: String,
    pub value: u64,
    pub color: String,
}

/// One point of an engagement series; `name` is a 3-letter weekday
/// abbreviation (or `"Day"` when the source date is unusable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementPoint {
    pub name: String,
    pub value: u64,
}

/// Per-entity visualization data: a three-slice sentiment breakdown plus an
/// ordered engagement series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub sentiment: Vec<SentimentSlice>,
    pub engagement: Vec<EngagementPoint>,
}

pub(crate) const POSITIVE_COLOR: &str = "#10b981";
pub(crate) const NEUTRAL_COLOR: &str = "#6b7280";
pub(crate) const NEGATIVE_COLOR: &str = "#ef4444";

impl ChartSeries {
    /// The fixed neutral-looking distribution (34/33/33) substituted when a
    /// platform carries no usable trend data. Consumers rely on these exact
    /// values and colors.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            sentiment: vec![
                SentimentSlice {
                    name: "Positive".to_string(),
                    value: 34,
                    color: POSITIVE_COLOR.to_string(),
                },
                SentimentSlice {
                    name: "Neutral".to_string(),
                    value: 33,
                    color: NEUTRAL_COLOR.to_string(),
                },
                SentimentSlice {
                    name: "Negative".to_string(),
                    value: 33,
                    color: NEGATIVE_COLOR.to_string(),
                },
            ],
            engagement: Vec::new(),
        }
    }
}

/// A synthesized multi-part narrative derived from aggregate statistics.
/// Always exactly 5 templated lines numbered `(1/5)`..`(5/5)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub id: String,
    pub title: String,
    pub content: Vec<String>,
    pub sentiment: Sentiment,
    pub platform: String,
}

/// Debug echo of the analyzed content, exposed on the raw-data tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEcho {
    pub platform: String,
    pub query: String,
    pub results: Vec<RawEchoItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEchoItem {
    pub id: String,
    pub text: String,
    pub sentiment: Sentiment,
}

/// The top-level aggregate produced by one fetch/normalize cycle.
///
/// `platform_data` and `platform_chart_data` keys are exactly the set of
/// platforms whose payload carried a valid `insights` array; malformed
/// platforms are silently absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightResultSet {
    pub insights: Vec<Insight>,
    pub thread_output: Vec<ThreadSummary>,
    pub chart_data: ChartSeries,
    pub raw_data: RawEcho,
    pub platform_data: HashMap<String, Vec<PlatformPost>>,
    pub platform_chart_data: HashMap<String, ChartSeries>,
}

/// Request parameters for one insight flow run.
///
/// [`Default`] carries the documented fallbacks, so callers never send an
/// unset field over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightParams {
    pub platforms: Vec<String>,
    pub preset: String,
    pub tone: String,
    pub date_range: String,
    /// Optional keyword focus list; omitted from the request body when
    /// `None`.
    pub keywords: Option<Vec<String>>,
}

impl Default for InsightParams {
    fn default() -> Self {
        Self {
            platforms: vec!["twitter".to_string()],
            preset: "standard".to_string(),
            tone: "professional".to_string(),
            date_range: "2025-04-01 to 2025-04-11".to_string(),
            keywords: None,
        }
    }
}
