//! # Orderdesk - Product and Order CRUD backend
//!
//! A thin pass-through between HTTP JSON and SQLite rows.
//!
//! Orderdesk provides:
//! - Flat entity schemas (`Product`, `Order`) with explicit field tables
//! - A generic `Manager` offering create/read/update/delete for any entity
//! - A process-wide `SessionProvider` handing out one unit of work per request
//! - An axum HTTP surface mapping manager results to JSON responses

pub mod entity;
pub mod manager;
pub mod storage;
pub mod server;
pub mod config;

// Re-exports for convenient access
pub use entity::{Entity, Fields, Order, Product};
pub use manager::Manager;
pub use storage::{Session, SessionProvider};

/// Result type alias for Orderdesk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Orderdesk operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown field '{field}' for {entity}")]
    UnknownField { entity: &'static str, field: String },

    #[error("Invalid value for '{field}': expected {expected}")]
    InvalidField { field: &'static str, expected: &'static str },
}
