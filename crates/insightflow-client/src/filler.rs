//! Client-synthesized filler insights.
//!
//! The polling layer splices one of these onto the front of a refreshed
//! result to keep the dashboard feeling live between real backend deltas.
//! Title, description, sentiment, and platform are drawn at random from
//! fixed pools.

use chrono::Utc;
use rand::seq::IndexedRandom;

use crate::token::random_token;
use crate::types::{Insight, Sentiment};

const TITLES: &[&str] = &[
    "Engagement Spike Detected",
    "Viral Hashtag Emerging",
    "User Sentiment Shift",
    "Community Feedback Pattern",
    "Competitor Mention Increase",
    "Industry Conversation Shift",
];

const DESCRIPTIONS: &[&str] = &[
    "A sudden rise in interactions around a trending topic is drawing new audiences into the conversation.",
    "Users are actively discussing recent product changes, with reactions split between enthusiasm and caution.",
    "Mentions of competing products picked up over the last polling window, mostly in comparison threads.",
    "Discussion volume is shifting toward industry news, pulling attention away from brand-owned content.",
    "A recurring request keeps surfacing in replies, suggesting an unmet need worth a closer look.",
];

const PLATFORMS: &[&str] = &["twitter", "reddit", "linkedin", "instagram", "youtube"];

const SENTIMENTS: &[Sentiment] = &[Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

/// Synthesizes one random filler [`Insight`] stamped with the current time.
#[must_use]
pub fn filler_insight() -> Insight {
    let mut rng = rand::rng();
    let title = TITLES.choose(&mut rng).copied().unwrap_or(TITLES[0]);
    let description = DESCRIPTIONS
        .choose(&mut rng)
        .copied()
        .unwrap_or(DESCRIPTIONS[0]);
    let platform = PLATFORMS.choose(&mut rng).copied().unwrap_or(PLATFORMS[0]);
    let sentiment = SENTIMENTS
        .choose(&mut rng)
        .copied()
        .unwrap_or(Sentiment::Neutral);

    Insight {
        id: random_token(),
        title: title.to_string(),
        description: description.to_string(),
        sentiment,
        timestamp: Utc::now(),
        platform: Some(platform.to_string()),
    }
}
