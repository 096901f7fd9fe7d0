use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{
    AddEntryRequest, ApiError, ApiResponse, AppState, EntryData, MessageData,
    RecommendationsData, UpdateEntryRequest, WatchlistData, validation,
};
use crate::db::{EntryChanges, NewEntry};
use crate::models::recommendation::PreferenceSummary;

/// GET /watchlist
pub async fn list_watchlist(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<WatchlistData>>, ApiError> {
    let watchlist = state
        .store
        .list_watchlist(user.id)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to fetch watchlist: {e}")))?;

    Ok(Json(ApiResponse::success(WatchlistData { watchlist })))
}

/// POST /watchlist
pub async fn add_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<AddEntryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EntryData>>), ApiError> {
    validation::validate_anime_id(payload.anime_id)?;

    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::validation("Title is required"));
    }
    if let Some(score) = payload.score {
        validation::validate_score(score)?;
    }

    let entry = NewEntry {
        anime_id: payload.anime_id,
        title: title.to_string(),
        image: payload.image.unwrap_or_default(),
        status: payload.status.unwrap_or_default(),
        score: payload.score,
    };

    let created = state
        .store
        .add_watchlist_entry(user.id, entry)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to add anime: {e}")))?
        .ok_or_else(|| ApiError::Conflict("Anime already in watchlist".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(EntryData {
            message: "Anime added to watchlist".to_string(),
            anime: created,
        })),
    ))
}

/// PUT /watchlist/{id}
pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateEntryRequest>,
) -> Result<Json<ApiResponse<EntryData>>, ApiError> {
    if let Some(score) = payload.score {
        validation::validate_score(score)?;
    }
    if let Some(title) = &payload.title {
        if title.trim().is_empty() {
            return Err(ApiError::validation("Title cannot be empty"));
        }
    }

    let changes = EntryChanges {
        title: payload.title.map(|t| t.trim().to_string()),
        image: payload.image,
        status: payload.status,
        score: payload.score,
    };

    let updated = state
        .store
        .update_watchlist_entry(user.id, id, changes)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to update anime: {e}")))?
        .ok_or_else(|| ApiError::NotFound("Anime not found".to_string()))?;

    Ok(Json(ApiResponse::success(EntryData {
        message: "Anime updated".to_string(),
        anime: updated,
    })))
}

/// DELETE /watchlist/{id}
pub async fn remove_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageData>>, ApiError> {
    let removed = state
        .store
        .remove_watchlist_entry(user.id, id)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to remove anime: {e}")))?;

    if !removed {
        return Err(ApiError::NotFound("Anime not found".to_string()));
    }

    Ok(Json(ApiResponse::success(MessageData {
        message: "Anime removed from watchlist".to_string(),
    })))
}

/// GET /watchlist/recommendations
///
/// An empty watchlist short-circuits with a guidance message; otherwise the
/// recommendation service always yields a batch, so this handler only fails
/// when the watchlist itself cannot be read.
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<RecommendationsData>>, ApiError> {
    let entries = state
        .store
        .list_watchlist(user.id)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to fetch watchlist: {e}")))?;

    let Some(summary) = PreferenceSummary::from_entries(&entries) else {
        return Ok(Json(ApiResponse::success(RecommendationsData::empty())));
    };

    let set = state.recommendations.recommend(&summary).await;

    Ok(Json(ApiResponse::success(RecommendationsData::generated(
        set, &summary,
    ))))
}
