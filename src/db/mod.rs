use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use tracing::info;

use crate::models::watchlist::WatchlistEntry;

pub mod migrator;
pub mod repositories;

pub use repositories::comment::CommentWithAuthor;
pub use repositories::user::User;
pub use repositories::watchlist::{EntryChanges, NewEntry};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn watchlist_repo(&self) -> repositories::watchlist::WatchlistRepository {
        repositories::watchlist::WatchlistRepository::new(self.conn.clone())
    }

    fn comment_repo(&self) -> repositories::comment::CommentRepository {
        repositories::comment::CommentRepository::new(self.conn.clone())
    }

    /// Returns `Ok(None)` when the email address is already taken.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<User>> {
        self.user_repo().create(username, email, password).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn list_watchlist(&self, user_id: i32) -> Result<Vec<WatchlistEntry>> {
        self.watchlist_repo().list_for_user(user_id).await
    }

    /// Returns `Ok(None)` when the title is already on the user's list.
    pub async fn add_watchlist_entry(
        &self,
        user_id: i32,
        entry: NewEntry,
    ) -> Result<Option<WatchlistEntry>> {
        self.watchlist_repo().add(user_id, entry).await
    }

    /// Returns `Ok(None)` when the entry is missing or owned by another user.
    pub async fn update_watchlist_entry(
        &self,
        user_id: i32,
        id: i32,
        changes: EntryChanges,
    ) -> Result<Option<WatchlistEntry>> {
        self.watchlist_repo().update(user_id, id, changes).await
    }

    /// Returns `false` when the entry is missing or owned by another user.
    pub async fn remove_watchlist_entry(&self, user_id: i32, id: i32) -> Result<bool> {
        self.watchlist_repo().remove(user_id, id).await
    }

    pub async fn list_comments(&self, anime_id: i32) -> Result<Vec<CommentWithAuthor>> {
        self.comment_repo().list_for_anime(anime_id).await
    }

    pub async fn add_comment(
        &self,
        user_id: i32,
        anime_id: i32,
        content: &str,
    ) -> Result<CommentWithAuthor> {
        self.comment_repo().add(user_id, anime_id, content).await
    }
}
