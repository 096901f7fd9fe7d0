//! Recommendation pipeline: summarize the watchlist, ask a text generator
//! for five suggestions, and fall back to the curated catalog when the
//! generator is unavailable or returns something unusable.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::models::recommendation::{
    PreferenceSummary, RecommendationItem, RecommendationSet, RecommendationSource,
};
use crate::models::watchlist::WatchStatus;
use crate::services::fallback;

/// Anything that can turn a prompt into freeform text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the backing model cannot be reached or produces
    /// no text.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON array in model output")]
    MissingArray,
    #[error("malformed recommendation array: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Produces recommendation batches. Holds no request state and is shared
/// across handlers behind an `Arc`.
pub struct RecommendationService {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl RecommendationService {
    #[must_use]
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    #[must_use]
    pub const fn is_ai_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Always yields a batch: generator output when it parses cleanly,
    /// catalog picks otherwise. Generator trouble is logged, never surfaced.
    pub async fn recommend(&self, summary: &PreferenceSummary) -> RecommendationSet {
        if let Some(generator) = &self.generator {
            let prompt = build_prompt(summary);
            match generator.generate(&prompt).await {
                Ok(text) => match parse_recommendations(&text) {
                    Ok(items) => {
                        return RecommendationSet {
                            items,
                            source: RecommendationSource::Ai,
                        };
                    }
                    Err(err) => {
                        warn!("Discarding unusable generator output: {err}");
                    }
                },
                Err(err) => {
                    warn!("Text generation failed: {err:#}");
                }
            }
        }

        RecommendationSet {
            items: fallback::picks(summary.total),
            source: RecommendationSource::Fallback,
        }
    }
}

const PROMPT_INSTRUCTIONS: &str = r#"Please recommend 5 diverse anime that would be perfect for this user. Consider their preferences and provide personalized reasons.

For each recommendation, provide:
1. The exact anime title
2. A detailed explanation of why this anime would appeal to them based on their specific watchlist and preferences (3-4 sentences)
3. The anime type (TV, Movie, OVA, etc.)
4. A brief description (1-2 sentences)
5. A specific reason tied to their watchlist (e.g., "If you enjoyed X, you'll love this because...")

Format your response as a JSON array with this structure:
[
  {
    "title": "Anime Title",
    "reason": "Detailed explanation of why this anime would appeal to the user based on their specific watchlist and preferences",
    "type": "TV/Movie/OVA",
    "description": "Brief description of the anime",
    "personalizedReason": "Specific reason tied to their watchlist preferences"
  }
]

Make sure each recommendation is different and tailored to their specific tastes. Only return the JSON array, no additional text."#;

fn build_prompt(summary: &PreferenceSummary) -> String {
    format!(
        "Based on this user's anime watchlist analysis:\n\n\
         ANIME LIST: {}\n\n\
         USER PREFERENCES ANALYSIS:\n\
         - Total anime in list: {}\n\
         - Most common status: {}\n\
         - Completed: {}\n\
         - Currently watching: {}\n\
         - Plan to watch: {}\n\n\
         {}",
        summary.titles.join(", "),
        summary.total,
        summary.favorite_status,
        summary.count_for(WatchStatus::Completed),
        summary.count_for(WatchStatus::Watching),
        summary.count_for(WatchStatus::PlanToWatch),
        PROMPT_INSTRUCTIONS,
    )
}

/// Models wrap the array in prose more often than not; take everything from
/// the first `[` to the last `]` and insist it parses as a full batch.
fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

pub fn parse_recommendations(text: &str) -> Result<Vec<RecommendationItem>, ParseError> {
    let json = extract_json_array(text).ok_or(ParseError::MissingArray)?;
    Ok(serde_json::from_str(json)?)
}
