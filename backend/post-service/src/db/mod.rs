/// Database access layer
///
/// `PostStore` is the seam between the engagement service and storage. The
/// PostgreSQL implementation keeps likes and comments embedded in the post row
/// and rewrites them as whole sequences.
pub mod post_repo;

pub use post_repo::PgPostStore;

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::models::{Comment, Like, Post, UserProfile};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use uuid::Uuid;

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Profile of a user, or `None` if no such user exists.
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>>;

    async fn insert_post(&self, post: &Post) -> Result<()>;

    /// Every post, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>>;

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>>;

    /// Returns `false` if there was nothing to delete.
    async fn delete_post(&self, post_id: Uuid) -> Result<bool>;

    /// Replace the post's like sequence. Fails with `PostNotFound` if the
    /// post disappeared since it was read.
    async fn save_likes(&self, post_id: Uuid, likes: &[Like]) -> Result<()>;

    /// Replace the post's comment sequence, same contract as `save_likes`.
    async fn save_comments(&self, post_id: Uuid, comments: &[Comment]) -> Result<()>;
}

/// Build the PostgreSQL pool and apply pending migrations.
pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "database pool created"
    );

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database migrations applied");

    Ok(pool)
}
