//! One watchlist row per (user, anime). Inserts rely on this index to reject
//! duplicates, so concurrent adds of the same anime resolve to exactly one
//! row. Pre-existing duplicates are collapsed to the oldest row first.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared(
            "DELETE FROM watchlist_entries WHERE id NOT IN (SELECT MIN(id) FROM watchlist_entries GROUP BY user_id, anime_id)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_watchlist_user_anime_unique ON watchlist_entries(user_id, anime_id)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared("DROP INDEX IF EXISTS idx_watchlist_user_anime_unique")
            .await?;

        Ok(())
    }
}
