//! Client for the social-insight analysis backend.
//!
//! Wraps the `/run-flow` endpoint behind [`InsightClient`], converts the
//! loosely-typed per-platform payload into the fixed [`InsightResultSet`]
//! shape via [`normalize`], and synthesizes liveness filler insights for the
//! polling layer.

mod client;
mod error;
mod filler;
mod normalize;
mod token;
mod types;

pub use client::InsightClient;
pub use error::InsightError;
pub use filler::filler_insight;
pub use normalize::{normalize, normalize_with};
pub use token::random_token;
pub use types::{
    ChartSeries, EngagementPoint, Insight, InsightParams, InsightResultSet, PlatformPost, RawEcho,
    RawEchoItem, Sentiment, SentimentSlice, ThreadSummary,
};
