use serde::{Deserialize, Serialize};

use crate::db::CommentWithAuthor;
use crate::models::recommendation::{
    PreferenceSummary, RecommendationItem, RecommendationSet, RecommendationSource,
};
use crate::models::watchlist::{WatchStatus, WatchlistEntry};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageData {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct WatchlistData {
    pub watchlist: Vec<WatchlistEntry>,
}

#[derive(Debug, Serialize)]
pub struct EntryData {
    pub message: String,
    pub anime: WatchlistEntry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEntryRequest {
    pub anime_id: i32,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub status: Option<WatchStatus>,
    #[serde(default)]
    pub score: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub status: Option<WatchStatus>,
    #[serde(default)]
    pub score: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: i32,
    pub anime_id: i32,
    pub content: String,
    pub created_at: String,
    pub user: CommentAuthorDto,
}

#[derive(Debug, Serialize)]
pub struct CommentAuthorDto {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<CommentWithAuthor> for CommentDto {
    fn from(comment: CommentWithAuthor) -> Self {
        Self {
            id: comment.id,
            anime_id: comment.anime_id,
            content: comment.content,
            created_at: comment.created_at,
            user: CommentAuthorDto {
                username: comment.username,
                avatar: comment.avatar,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferencesDto {
    pub total_anime: usize,
    pub favorite_status: WatchStatus,
    pub completed_count: usize,
    pub watching_count: usize,
    pub plan_to_watch_count: usize,
}

impl From<&PreferenceSummary> for UserPreferencesDto {
    fn from(summary: &PreferenceSummary) -> Self {
        Self {
            total_anime: summary.total,
            favorite_status: summary.favorite_status,
            completed_count: summary.count_for(WatchStatus::Completed),
            watching_count: summary.count_for(WatchStatus::Watching),
            plan_to_watch_count: summary.count_for(WatchStatus::PlanToWatch),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsData {
    pub recommendations: Vec<RecommendationItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watchlist_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_preferences: Option<UserPreferencesDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<RecommendationSource>,
}

impl RecommendationsData {
    /// Guidance payload for a user with nothing on their list yet.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            recommendations: Vec::new(),
            message: Some(
                "Add some anime to your watchlist to get personalized recommendations!"
                    .to_string(),
            ),
            watchlist_count: None,
            user_preferences: None,
            source: None,
        }
    }

    #[must_use]
    pub fn generated(set: RecommendationSet, summary: &PreferenceSummary) -> Self {
        Self {
            recommendations: set.items,
            message: None,
            watchlist_count: Some(summary.total),
            user_preferences: Some(summary.into()),
            source: Some(set.source),
        }
    }
}
