//! OXL Location Server Library
//!
//! This module exports the core types and functions for testing and reuse.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod presence;
pub mod routes;
pub mod security;
pub mod ws;

pub use config::Config;
pub use error::{AppError, Result};

use std::sync::Arc;

use presence::PresenceRegistry;
use ws::BroadcastHub;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub config: Config,
    pub presence: Arc<PresenceRegistry>,
    pub hub: Arc<BroadcastHub>,
}

impl AppState {
    /// Create a new AppState with the given pool and configuration
    pub fn new(pool: sqlx::SqlitePool, config: Config) -> Self {
        Self {
            pool,
            config,
            presence: Arc::new(PresenceRegistry::new()),
            hub: Arc::new(BroadcastHub::new()),
        }
    }
}
