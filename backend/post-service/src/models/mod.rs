/// Data models for post-service
///
/// This module defines structures for:
/// - Post: a text post with its engagement embedded
/// - Like / Comment: engagement records, newest first
/// - UserProfile: the slice of a user that posts and comments snapshot
///
/// The engagement rules (like uniqueness, front insertion, comment removal)
/// live on `Post` so they can be exercised without a store.
use crate::error::{AppError, Result};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Profile fields denormalized into posts and comments at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Like {
    pub user: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Post {
    pub id: Uuid,
    /// Owner; never changes after creation
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    pub date: DateTime<Utc>,
}

/// Which element DeleteComment actually removes once the target comment has
/// been found and its author checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentRemovalPolicy {
    /// Remove the caller's first comment in sequence order, which is not
    /// necessarily the one addressed by the request.
    #[default]
    CallerIndex,
    /// Remove exactly the addressed comment.
    CommentId,
}

impl FromStr for CommentRemovalPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "caller-index" => Ok(Self::CallerIndex),
            "comment-id" => Ok(Self::CommentId),
            other => Err(format!(
                "unknown comment removal policy '{}' (expected caller-index or comment-id)",
                other
            )),
        }
    }
}

impl fmt::Display for CommentRemovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CallerIndex => f.write_str("caller-index"),
            Self::CommentId => f.write_str("comment-id"),
        }
    }
}

/// Current time at the precision PostgreSQL stores (microseconds).
fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

impl Post {
    /// Build a fresh post owned by `author`, snapshotting their profile now.
    pub fn new(author: &UserProfile, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: author.id,
            text: text.into(),
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            likes: Vec::new(),
            comments: Vec::new(),
            date: timestamp(),
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user == user_id
    }

    pub fn has_liked(&self, user_id: Uuid) -> bool {
        self.likes.iter().any(|like| like.user == user_id)
    }

    pub fn like(&mut self, user_id: Uuid) -> Result<()> {
        if self.has_liked(user_id) {
            return Err(AppError::AlreadyLiked);
        }
        self.likes.insert(0, Like { user: user_id });
        Ok(())
    }

    /// Drops the first like by `user_id`, scanning from the front.
    pub fn unlike(&mut self, user_id: Uuid) -> Result<()> {
        let index = self
            .likes
            .iter()
            .position(|like| like.user == user_id)
            .ok_or(AppError::NotLiked)?;
        self.likes.remove(index);
        Ok(())
    }

    pub fn add_comment(&mut self, author: &UserProfile, text: impl Into<String>) -> &Comment {
        self.comments.insert(
            0,
            Comment {
                id: Uuid::new_v4(),
                user: author.id,
                text: text.into(),
                name: author.name.clone(),
                avatar: author.avatar.clone(),
                date: timestamp(),
            },
        );
        &self.comments[0]
    }

    /// Remove a comment on behalf of `caller`.
    ///
    /// `comment_id` must exist and be authored by `caller`; which element is
    /// then removed depends on `policy`. Returns the removed comment.
    pub fn remove_comment(
        &mut self,
        caller: Uuid,
        comment_id: Uuid,
        policy: CommentRemovalPolicy,
    ) -> Result<Comment> {
        let target = self
            .comments
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or(AppError::CommentNotFound)?;

        if self.comments[target].user != caller {
            return Err(AppError::NotAuthorized);
        }

        let index = match policy {
            CommentRemovalPolicy::CommentId => target,
            CommentRemovalPolicy::CallerIndex => self
                .comments
                .iter()
                .position(|c| c.user == caller)
                .unwrap_or(target),
        };

        Ok(self.comments.remove(index))
    }
}
