//! Polling/presentation layer for insight data.
//!
//! [`InsightFeed`] wraps an [`InsightSource`] in a background poll loop,
//! caches the latest result, flags "new data" arrivals, and splices
//! client-synthesized filler insights between real fetches for perceived
//! liveness. Consumers observe the feed through cheap [`FeedSnapshot`]
//! clones published over a watch channel.

mod feed;
mod source;

pub use feed::{FeedOptions, FeedSnapshot, InsightFeed};
pub use source::InsightSource;
