use serde::{Deserialize, Serialize};

use crate::entities::watchlist_entries;

/// Watch state of a single tracked title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WatchStatus {
    #[serde(rename = "watching")]
    Watching,
    #[serde(rename = "completed")]
    Completed,
    #[default]
    #[serde(rename = "plan to watch")]
    PlanToWatch,
    #[serde(rename = "dropped")]
    Dropped,
}

impl WatchStatus {
    pub const ALL: [Self; 4] = [
        Self::Watching,
        Self::Completed,
        Self::PlanToWatch,
        Self::Dropped,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Watching => "watching",
            Self::Completed => "completed",
            Self::PlanToWatch => "plan to watch",
            Self::Dropped => "dropped",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "watching" => Some(Self::Watching),
            "completed" => Some(Self::Completed),
            "plan to watch" => Some(Self::PlanToWatch),
            "dropped" => Some(Self::Dropped),
            _ => None,
        }
    }
}

impl std::fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked title as seen by the API and the recommendation pipeline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub id: i32,
    pub anime_id: i32,
    pub title: String,
    pub image: String,
    pub status: WatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<watchlist_entries::Model> for WatchlistEntry {
    fn from(model: watchlist_entries::Model) -> Self {
        Self {
            id: model.id,
            anime_id: model.anime_id,
            title: model.title,
            image: model.image,
            status: WatchStatus::parse(&model.status).unwrap_or_default(),
            score: model.score,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
