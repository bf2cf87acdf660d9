//! Piquante - Hot Sauce Review API
//!
//! A Rust REST API server for a hot-sauce review application: user
//! signup/login with hashed passwords and bearer tokens, and CRUD plus
//! like/dislike operations on sauces with image upload.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
