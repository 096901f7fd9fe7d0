use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};

use crate::entities::watchlist_entries;
use crate::models::watchlist::{WatchStatus, WatchlistEntry};

/// Fields for a new watchlist row.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub anime_id: i32,
    pub title: String,
    pub image: String,
    pub status: WatchStatus,
    pub score: Option<f32>,
}

/// Partial edit; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct EntryChanges {
    pub title: Option<String>,
    pub image: Option<String>,
    pub status: Option<WatchStatus>,
    pub score: Option<f32>,
}

pub struct WatchlistRepository {
    conn: DatabaseConnection,
}

impl WatchlistRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All entries for one user, oldest first.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<WatchlistEntry>> {
        let models = watchlist_entries::Entity::find()
            .filter(watchlist_entries::Column::UserId.eq(user_id))
            .order_by_asc(watchlist_entries::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query watchlist")?;

        Ok(models.into_iter().map(WatchlistEntry::from).collect())
    }

    /// Insert a new entry for the user.
    ///
    /// Returns `Ok(None)` when the anime is already on the list. The unique
    /// index on `(user_id, anime_id)` is the authority, so concurrent adds of
    /// the same anime resolve to exactly one row.
    pub async fn add(&self, user_id: i32, entry: NewEntry) -> Result<Option<WatchlistEntry>> {
        let now = chrono::Utc::now().to_rfc3339();
        let active = watchlist_entries::ActiveModel {
            user_id: Set(user_id),
            anime_id: Set(entry.anime_id),
            title: Set(entry.title),
            image: Set(entry.image),
            status: Set(entry.status.as_str().to_string()),
            score: Set(entry.score),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Some(model.into())),
            Err(err) => {
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    return Ok(None);
                }
                Err(err).context("Failed to insert watchlist entry")
            }
        }
    }

    /// Apply status/score changes to one of the user's entries.
    ///
    /// Returns `Ok(None)` when the entry does not exist or belongs to someone
    /// else; callers cannot tell the two apart.
    pub async fn update(
        &self,
        user_id: i32,
        id: i32,
        changes: EntryChanges,
    ) -> Result<Option<WatchlistEntry>> {
        let model = watchlist_entries::Entity::find_by_id(id)
            .filter(watchlist_entries::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query watchlist entry")?;

        let Some(model) = model else {
            return Ok(None);
        };

        let mut active: watchlist_entries::ActiveModel = model.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(image) = changes.image {
            active.image = Set(image);
        }
        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(score) = changes.score {
            active.score = Set(Some(score));
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update watchlist entry")?;

        Ok(Some(updated.into()))
    }

    /// Delete one of the user's entries. Returns `false` when nothing matched.
    pub async fn remove(&self, user_id: i32, id: i32) -> Result<bool> {
        let result = watchlist_entries::Entity::delete_many()
            .filter(watchlist_entries::Column::Id.eq(id))
            .filter(watchlist_entries::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete watchlist entry")?;

        Ok(result.rows_affected > 0)
    }
}
