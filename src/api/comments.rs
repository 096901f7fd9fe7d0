use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, CommentDto, CommentRequest, auth, validation};

/// GET /comments/{anime_id}
///
/// Public: anyone can read the discussion under a title.
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(anime_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<CommentDto>>>, ApiError> {
    validation::validate_anime_id(anime_id)?;

    let comments = state
        .store
        .list_comments(anime_id)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to fetch comments: {e}")))?;

    Ok(Json(ApiResponse::success(
        comments.into_iter().map(CommentDto::from).collect(),
    )))
}

/// POST /comments/{anime_id}
///
/// Shares its path with the public listing, so the bearer check happens here
/// rather than in router middleware.
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path(anime_id): Path<i32>,
    headers: HeaderMap,
    Json(payload): Json<CommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommentDto>>), ApiError> {
    let user = auth::authenticate(&state, &headers).await?;

    validation::validate_anime_id(anime_id)?;
    let content = validation::validate_comment_content(&payload.content)?;

    let comment = state
        .store
        .add_comment(user.id, anime_id, content)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to add comment: {e}")))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(comment.into())),
    ))
}
