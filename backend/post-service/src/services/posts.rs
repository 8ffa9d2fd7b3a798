/// Post service - post lifecycle and engagement (likes, comments)
///
/// Every operation is lookup → check → mutate → persist. Engagement writes
/// replace the whole like/comment sequence of one post, so two concurrent
/// writers on the same post can lose an update.
use crate::db::PostStore;
use crate::error::{AppError, Result};
use crate::models::{Comment, CommentRemovalPolicy, Like, Post, UserProfile};
use std::sync::Arc;
use uuid::Uuid;

pub struct PostService {
    store: Arc<dyn PostStore>,
    comment_removal: CommentRemovalPolicy,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self {
            store,
            comment_removal: CommentRemovalPolicy::default(),
        }
    }

    pub fn with_comment_removal(mut self, policy: CommentRemovalPolicy) -> Self {
        self.comment_removal = policy;
        self
    }

    /// Create a post owned by the caller
    pub async fn create_post(&self, caller: Uuid, text: &str) -> Result<Post> {
        let author = self.load_profile(caller).await?;
        let post = Post::new(&author, text);

        self.store.insert_post(&post).await?;
        tracing::info!(post_id = %post.id, user_id = %caller, "post created");

        Ok(post)
    }

    /// All posts, newest first
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        self.store.list_posts().await
    }

    /// Get a post by ID; malformed IDs are reported as not found
    pub async fn get_post(&self, post_id: &str) -> Result<Post> {
        let post_id = parse_id(post_id, AppError::PostNotFound)?;
        self.store
            .find_post(post_id)
            .await?
            .ok_or(AppError::PostNotFound)
    }

    /// Delete a post the caller owns, together with its likes and comments
    pub async fn delete_post(&self, caller: Uuid, post_id: &str) -> Result<()> {
        let post = self.get_post(post_id).await?;

        if !post.is_owned_by(caller) {
            tracing::warn!(post_id = %post.id, user_id = %caller, "post deletion denied");
            return Err(AppError::NotAuthorized);
        }

        if !self.store.delete_post(post.id).await? {
            return Err(AppError::PostNotFound);
        }
        tracing::info!(post_id = %post.id, user_id = %caller, "post deleted");

        Ok(())
    }

    /// Like (`like = true`) or unlike a post; returns the resulting likes
    pub async fn toggle_like(&self, caller: Uuid, post_id: &str, like: bool) -> Result<Vec<Like>> {
        let mut post = self.get_post(post_id).await?;

        if like {
            post.like(caller)?;
        } else {
            post.unlike(caller)?;
        }

        self.store.save_likes(post.id, &post.likes).await?;
        tracing::debug!(post_id = %post.id, user_id = %caller, like, "like toggled");

        Ok(post.likes)
    }

    /// Add a comment at the front of the post's comments; returns them all
    pub async fn add_comment(&self, caller: Uuid, post_id: &str, text: &str) -> Result<Vec<Comment>> {
        let mut post = self.get_post(post_id).await?;
        let author = self.load_profile(caller).await?;

        let comment_id = post.add_comment(&author, text).id;
        self.store.save_comments(post.id, &post.comments).await?;
        tracing::info!(post_id = %post.id, %comment_id, user_id = %caller, "comment added");

        Ok(post.comments)
    }

    /// Delete one of the caller's comments; returns the remaining comments
    pub async fn delete_comment(
        &self,
        caller: Uuid,
        post_id: &str,
        comment_id: &str,
    ) -> Result<Vec<Comment>> {
        let mut post = self.get_post(post_id).await?;
        let comment_id = parse_id(comment_id, AppError::CommentNotFound)?;

        let removed = post.remove_comment(caller, comment_id, self.comment_removal)?;
        self.store.save_comments(post.id, &post.comments).await?;
        tracing::info!(
            post_id = %post.id,
            requested = %comment_id,
            removed = %removed.id,
            user_id = %caller,
            "comment deleted"
        );

        Ok(post.comments)
    }

    async fn load_profile(&self, user_id: Uuid) -> Result<UserProfile> {
        self.store
            .find_profile(user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }
}

fn parse_id(raw: &str, not_found: AppError) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| not_found)
}
