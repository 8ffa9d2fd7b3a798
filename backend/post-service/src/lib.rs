/// Post Service Library
///
/// Text posts with likes and comments, served over HTTP for authenticated
/// callers.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route table
/// - `models`: Post, Like, Comment and the engagement rules on them
/// - `services`: Post engagement service
/// - `db`: Storage trait and PostgreSQL implementation
/// - `middleware`: JWT authentication and request timing
/// - `security`: Token verification
/// - `error`: Error types and their HTTP rendering
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod security;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
