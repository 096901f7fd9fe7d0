use serde::{Deserialize, Serialize};

use crate::models::watchlist::{WatchStatus, WatchlistEntry};

/// One recommended title, in the shape the model is asked to produce.
///
/// All five fields are required; a generated item missing any of them is
/// treated as a malformed response rather than silently patched up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationItem {
    pub title: String,
    pub reason: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub description: String,
    pub personalized_reason: String,
}

/// Where a recommendation batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    Ai,
    Fallback,
}

/// A batch of recommendations plus its provenance.
#[derive(Debug, Clone)]
pub struct RecommendationSet {
    pub items: Vec<RecommendationItem>,
    pub source: RecommendationSource,
}

/// Aggregated view of a watchlist, used to build the model prompt and to
/// report preference stats back to the caller.
#[derive(Debug, Clone)]
pub struct PreferenceSummary {
    pub total: usize,
    pub status_counts: Vec<(WatchStatus, usize)>,
    pub favorite_status: WatchStatus,
    pub titles: Vec<String>,
}

impl PreferenceSummary {
    /// Returns `None` for an empty watchlist; there is nothing to summarize
    /// and the caller short-circuits before reaching the generator.
    #[must_use]
    pub fn from_entries(entries: &[WatchlistEntry]) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }

        let mut status_counts: Vec<(WatchStatus, usize)> = Vec::new();
        let mut titles = Vec::with_capacity(entries.len());

        for entry in entries {
            match status_counts
                .iter_mut()
                .find(|(status, _)| *status == entry.status)
            {
                Some((_, count)) => *count += 1,
                None => status_counts.push((entry.status, 1)),
            }
            titles.push(entry.title.clone());
        }

        // Ties go to the status seen first in list order.
        let mut favorite = status_counts[0];
        for &(status, count) in &status_counts[1..] {
            if count > favorite.1 {
                favorite = (status, count);
            }
        }

        Some(Self {
            total: entries.len(),
            status_counts,
            favorite_status: favorite.0,
            titles,
        })
    }

    #[must_use]
    pub fn count_for(&self, status: WatchStatus) -> usize {
        self.status_counts
            .iter()
            .find(|(candidate, _)| *candidate == status)
            .map_or(0, |(_, count)| *count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i32, title: &str, status: WatchStatus) -> WatchlistEntry {
        WatchlistEntry {
            id,
            anime_id: id,
            title: title.to_string(),
            image: String::new(),
            status,
            score: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn empty_watchlist_has_no_summary() {
        assert!(PreferenceSummary::from_entries(&[]).is_none());
    }

    #[test]
    fn summary_counts_statuses_and_keeps_titles_in_order() {
        let entries = vec![
            entry(1, "Steins;Gate", WatchStatus::Completed),
            entry(2, "Mushishi", WatchStatus::Watching),
            entry(3, "Planetes", WatchStatus::Completed),
            entry(4, "Texhnolyze", WatchStatus::Dropped),
        ];

        let summary = PreferenceSummary::from_entries(&entries).unwrap();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.favorite_status, WatchStatus::Completed);
        assert_eq!(summary.count_for(WatchStatus::Completed), 2);
        assert_eq!(summary.count_for(WatchStatus::Watching), 1);
        assert_eq!(summary.count_for(WatchStatus::PlanToWatch), 0);
        assert_eq!(
            summary.titles,
            vec!["Steins;Gate", "Mushishi", "Planetes", "Texhnolyze"]
        );
    }

    #[test]
    fn favorite_status_tie_goes_to_first_seen() {
        let entries = vec![
            entry(1, "A", WatchStatus::Watching),
            entry(2, "B", WatchStatus::Completed),
            entry(3, "C", WatchStatus::Watching),
            entry(4, "D", WatchStatus::Completed),
        ];

        let summary = PreferenceSummary::from_entries(&entries).unwrap();
        assert_eq!(summary.favorite_status, WatchStatus::Watching);
    }

    #[test]
    fn item_uses_the_wire_field_names() {
        let json = r#"{
            "title": "Monster",
            "reason": "Slow-burn psychological thriller.",
            "type": "TV",
            "description": "A surgeon hunts the killer he once saved.",
            "personalizedReason": "If you enjoyed Death Note, you'll love this."
        }"#;

        let item: RecommendationItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.media_type, "TV");
        assert_eq!(
            serde_json::to_value(&item).unwrap()["personalizedReason"],
            "If you enjoyed Death Note, you'll love this."
        );
    }

    #[test]
    fn item_with_missing_field_fails_to_parse() {
        let json = r#"{"title": "Monster", "reason": "x", "type": "TV", "description": "y"}"#;
        assert!(serde_json::from_str::<RecommendationItem>(json).is_err());
    }

    #[test]
    fn source_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RecommendationSource::Fallback).unwrap(),
            "\"fallback\""
        );
    }
}
