//! Shared fixtures for post-service integration tests
#![allow(dead_code)]

pub mod memory_store;

use actix_web::web;
use chrono::Duration;
use post_service::models::{CommentRemovalPolicy, UserProfile};
use post_service::security::JwtKeys;
use post_service::services::PostService;
use std::sync::Arc;

pub use memory_store::MemoryPostStore;

pub const TEST_SECRET: &str = "post-service-integration-secret";

pub struct TestContext {
    pub store: MemoryPostStore,
    pub service: web::Data<PostService>,
    pub keys: Arc<JwtKeys>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_policy(CommentRemovalPolicy::CallerIndex)
    }

    pub fn with_policy(policy: CommentRemovalPolicy) -> Self {
        let store = MemoryPostStore::new();
        let service = PostService::new(Arc::new(store.clone())).with_comment_removal(policy);

        Self {
            store,
            service: web::Data::new(service),
            keys: Arc::new(JwtKeys::from_secret(TEST_SECRET)),
        }
    }

    pub fn token_for(&self, user: &UserProfile) -> String {
        self.keys
            .issue(user.id, Duration::hours(1))
            .expect("issue test token")
    }
}

/// Build the `/api/v1` service exactly as the binary mounts it.
#[allow(unused_macros)]
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new().app_data($ctx.service.clone()).service(
                actix_web::web::scope("/api/v1")
                    .wrap(post_service::middleware::JwtAuthMiddleware::new(
                        $ctx.keys.clone(),
                    ))
                    .configure(post_service::handlers::configure),
            ),
        )
        .await
    };
}
