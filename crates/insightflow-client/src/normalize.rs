//! Normalization of the loosely-typed backend payload into the fixed
//! [`InsightResultSet`] shape.
//!
//! The normalizer is tolerant by design: missing or malformed fields default
//! rather than error, and a platform whose `insights` field is absent or not
//! an array is skipped entirely. A malformed backend response can only
//! produce impoverished output, never a failure.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::token::random_token;
use crate::types::{
    ChartSeries, EngagementPoint, Insight, InsightResultSet, PlatformPost, RawEcho, RawEchoItem,
    Sentiment, SentimentSlice, ThreadSummary, NEGATIVE_COLOR, NEUTRAL_COLOR, POSITIVE_COLOR,
};

/// Converts a raw `/run-flow` response body into an [`InsightResultSet`].
///
/// Insight ids are freshly generated random tokens on every call, even for
/// byte-identical input.
#[must_use]
pub fn normalize(raw: &Value) -> InsightResultSet {
    normalize_with(raw, random_token)
}

/// [`normalize`] with an injected id generator.
///
/// Production code uses [`random_token`]; tests substitute a deterministic
/// generator to get stable ids.
#[must_use]
pub fn normalize_with<F>(raw: &Value, mut next_id: F) -> InsightResultSet
where
    F: FnMut() -> String,
{
    let platforms = raw.get("platforms").and_then(Value::as_object);

    let mut insights: Vec<Insight> = Vec::new();
    let mut platform_data = HashMap::new();
    let mut platform_chart_data = HashMap::new();
    // Chart data of the first platform that produced any, in payload key order.
    let mut chart_data: Option<ChartSeries> = None;

    if let Some(platforms) = platforms {
        for (platform, data) in platforms {
            let Some(items) = data.get("insights").and_then(Value::as_array) else {
                tracing::warn!(platform = %platform, "no valid insights payload for platform, skipping");
                continue;
            };

            let start = insights.len();
            for item in items {
                insights.push(map_insight(item, platform, next_id()));
            }

            let content_lines = insights[start..]
                .iter()
                .map(|i| i.description.clone())
                .collect();
            platform_data.insert(
                platform.clone(),
                vec![PlatformPost {
                    title: format!("{} Insights", capitalize(platform)),
                    link: Some(format!(
                        "https://{}.com/insights",
                        platform.to_lowercase()
                    )),
                    content_lines,
                }],
            );

            let series = chart_series(data.get("charts"));
            if chart_data.is_none() {
                chart_data = Some(series.clone());
            }
            platform_chart_data.insert(platform.clone(), series);
        }
    }

    let summary = raw.get("summary");
    let total_posts = summary
        .and_then(|s| s.get("totalPosts"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let dominant = summary
        .and_then(|s| s.get("dominantSentiment"))
        .and_then(Value::as_str)
        .unwrap_or("Neutral");
    let top_platform = summary
        .and_then(|s| s.get("topPlatform"))
        .and_then(Value::as_str)
        .unwrap_or("Twitter");

    // Counts every platform key, including ones skipped above.
    let platform_count = platforms.map_or(0, |p| p.len());
    let first_platform = platforms
        .and_then(|p| p.keys().next())
        .map_or("twitter", String::as_str);

    let thread = ThreadSummary {
        id: "1".to_string(),
        title: "Platform Analysis".to_string(),
        content: vec![
            format!("🧵 Analysis of {total_posts} posts across {platform_count} platforms (1/5):"),
            format!(
                "The dominant sentiment is {dominant} with {top_platform} showing the most activity. (2/5)"
            ),
            "Key trends show engagement patterns correlating with content type and timing. (3/5)"
                .to_string(),
            "User discussions are centered around product features and industry developments. (4/5)"
                .to_string(),
            format!(
                "Recommendation: Focus content strategy on {top_platform} with {} messaging. (5/5)",
                dominant.to_lowercase()
            ),
        ],
        sentiment: Sentiment::from_raw(Some(dominant)),
        platform: first_platform.to_string(),
    };

    let raw_data = RawEcho {
        platform: first_platform.to_string(),
        query: "Analysis".to_string(),
        results: insights
            .iter()
            .map(|i| RawEchoItem {
                id: i.id.clone(),
                text: i.description.clone(),
                sentiment: i.sentiment,
            })
            .collect(),
    };

    InsightResultSet {
        insights,
        thread_output: vec![thread],
        chart_data: chart_data.unwrap_or_else(ChartSeries::fallback),
        raw_data,
        platform_data,
        platform_chart_data,
    }
}

fn map_insight(item: &Value, platform: &str, id: String) -> Insight {
    let title = item
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("Untitled Insight");
    let description = item.get("summary").and_then(Value::as_str).unwrap_or("");
    let sentiment = Sentiment::from_raw(item.get("sentiment").and_then(Value::as_str));
    let timestamp = item
        .get("date")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .unwrap_or_else(Utc::now);

    Insight {
        id,
        title: title.to_string(),
        description: description.to_string(),
        sentiment,
        timestamp,
        platform: Some(platform.to_string()),
    }
}

/// Parses a backend date as RFC 3339, falling back to bare `YYYY-MM-DD`
/// (interpreted as midnight UTC).
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}

/// Builds the per-platform chart series from an optional `charts` object.
///
/// A missing or empty `sentimentTrend` yields the fixed fallback
/// distribution with an empty engagement series.
fn chart_series(charts: Option<&Value>) -> ChartSeries {
    let trend = charts
        .and_then(|c| c.get("sentimentTrend"))
        .and_then(Value::as_array)
        .filter(|t| !t.is_empty());

    let Some(trend) = trend else {
        return ChartSeries::fallback();
    };

    let first = &trend[0];
    let slice_value = |key: &str| first.get(key).and_then(Value::as_u64).unwrap_or(0);
    let sentiment = vec![
        SentimentSlice {
            name: "Positive".to_string(),
            value: slice_value("positive"),
            color: POSITIVE_COLOR.to_string(),
        },
        SentimentSlice {
            name: "Neutral".to_string(),
            value: slice_value("neutral"),
            color: NEUTRAL_COLOR.to_string(),
        },
        SentimentSlice {
            name: "Negative".to_string(),
            value: slice_value("negative"),
            color: NEGATIVE_COLOR.to_string(),
        },
    ];

    let engagement = charts
        .and_then(|c| c.get("engagement"))
        .and_then(Value::as_array)
        .map(|items| items.iter().map(engagement_point).collect())
        .unwrap_or_default();

    ChartSeries {
        sentiment,
        engagement,
    }
}

fn engagement_point(item: &Value) -> EngagementPoint {
    let name = item
        .get("date")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .map_or_else(|| "Day".to_string(), |d| d.format("%a").to_string());
    EngagementPoint {
        name,
        value: item.get("value").and_then(Value::as_u64).unwrap_or(0),
    }
}

/// Upper-cases the first character, leaving the rest untouched.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
