use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{comments, users};

/// A comment joined with its author's public profile.
#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub id: i32,
    pub anime_id: i32,
    pub content: String,
    pub created_at: String,
    pub username: String,
    pub avatar: Option<String>,
}

impl CommentWithAuthor {
    fn from_row(comment: comments::Model, author: Option<users::Model>) -> Self {
        let (username, avatar) = author.map_or((String::new(), None), |u| (u.username, u.avatar));
        Self {
            id: comment.id,
            anime_id: comment.anime_id,
            content: comment.content,
            created_at: comment.created_at,
            username,
            avatar,
        }
    }
}

pub struct CommentRepository {
    conn: DatabaseConnection,
}

impl CommentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All comments on one title, newest first, with author profiles attached.
    pub async fn list_for_anime(&self, anime_id: i32) -> Result<Vec<CommentWithAuthor>> {
        let rows = comments::Entity::find()
            .filter(comments::Column::AnimeId.eq(anime_id))
            .find_also_related(users::Entity)
            .order_by_desc(comments::Column::CreatedAt)
            .order_by_desc(comments::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query comments")?;

        Ok(rows
            .into_iter()
            .map(|(comment, author)| CommentWithAuthor::from_row(comment, author))
            .collect())
    }

    /// Insert a comment and return it with the author profile attached.
    pub async fn add(
        &self,
        user_id: i32,
        anime_id: i32,
        content: &str,
    ) -> Result<CommentWithAuthor> {
        let active = comments::ActiveModel {
            user_id: Set(user_id),
            anime_id: Set(anime_id),
            content: Set(content.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert comment")?;

        let (comment, author) = comments::Entity::find_by_id(model.id)
            .find_also_related(users::Entity)
            .one(&self.conn)
            .await
            .context("Failed to reload comment")?
            .ok_or_else(|| anyhow::anyhow!("Comment {} missing after insert", model.id))?;

        Ok(CommentWithAuthor::from_row(comment, author))
    }
}
