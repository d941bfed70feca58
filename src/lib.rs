//! # Medalboard - Olympic athlete results backend
//!
//! CRUD over Olympic athletes, their results, and the countries and sports
//! they reference, exposed as a small JSON REST API.
//!
//! Medalboard provides:
//! - SQLite-backed storage for the Country -> Athlete -> Result hierarchy
//! - An aggregate reconciler that merges a submitted athlete graph into storage
//! - Read-only lookups over reference data
//! - An axum HTTP server and a CLI for seeding and inspection

pub mod model;
pub mod submission;
pub mod storage;
pub mod reconciler;
pub mod lookup;
pub mod seed;
pub mod server;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use model::{Athlete, AthleteResult, Country, Sport};
pub use submission::{AthleteSubmission, Reference, ResultSubmission};
pub use storage::{Gateway, SqliteStore};
pub use lookup::LookupService;

/// Result type alias for Medalboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Medalboard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// True for failures caused by the request rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::NotFound { .. } | Error::Validation(_))
    }
}
