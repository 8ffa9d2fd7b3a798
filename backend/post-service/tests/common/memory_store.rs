//! In-memory PostStore for integration tests
//!
//! Mirrors the PostgreSQL store's contract without a database: posts come
//! back newest first, engagement saves fail with PostNotFound for missing
//! posts.

use async_trait::async_trait;
use post_service::db::PostStore;
use post_service::error::{AppError, Result};
use post_service::models::{Comment, Like, Post, UserProfile};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MemoryPostStore {
    users: Arc<Mutex<HashMap<Uuid, UserProfile>>>,
    posts: Arc<Mutex<HashMap<Uuid, Post>>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user and return their profile
    pub fn add_user(&self, name: &str) -> UserProfile {
        let profile = UserProfile {
            id: Uuid::new_v4(),
            name: name.to_string(),
            avatar: format!("//www.gravatar.com/avatar/{}", name.to_lowercase()),
        };
        self.users
            .lock()
            .unwrap()
            .insert(profile.id, profile.clone());
        profile
    }

    /// Change a stored profile after the fact (snapshots must not follow)
    pub fn rename_user(&self, user_id: Uuid, name: &str) {
        if let Some(profile) = self.users.lock().unwrap().get_mut(&user_id) {
            profile.name = name.to_string();
        }
    }

    pub fn post(&self, post_id: Uuid) -> Option<Post> {
        self.posts.lock().unwrap().get(&post_id).cloned()
    }

    pub fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn insert_post(&self, post: &Post) -> Result<()> {
        self.posts.lock().unwrap().insert(post.id, post.clone());
        Ok(())
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self.posts.lock().unwrap().values().cloned().collect();
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        Ok(self.post(post_id))
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
        Ok(self.posts.lock().unwrap().remove(&post_id).is_some())
    }

    async fn save_likes(&self, post_id: Uuid, likes: &[Like]) -> Result<()> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts.get_mut(&post_id).ok_or(AppError::PostNotFound)?;
        post.likes = likes.to_vec();
        Ok(())
    }

    async fn save_comments(&self, post_id: Uuid, comments: &[Comment]) -> Result<()> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts.get_mut(&post_id).ok_or(AppError::PostNotFound)?;
        post.comments = comments.to_vec();
        Ok(())
    }
}
