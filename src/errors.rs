//! Unified application error type.
//! All modules (db, core, ui, cli) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("No sleep night with id {0}")]
    NightNotFound(i64),

    // ---------------------------
    // Background work
    // ---------------------------
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Notice raised by a view-state whose storage call failed.
    #[error("{0}")]
    Storage(String),

    // ---------------------------
    // Parsing / validation errors
    // ---------------------------
    #[error("Invalid sleep quality: {0} (expected -1 for unrated or 0..=5)")]
    InvalidQuality(i32),

    #[error("Unknown view type {0}")]
    UnknownViewType(i32),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
