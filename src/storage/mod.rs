//! Storage Layer - SQLite-backed persistence
//!
//! One database file with tables:
//! - Product(id, name, price)
//! - Order(id, client_name, product_id -> Product.id, client_house)
//!
//! A `SessionProvider` is created once per process; each request takes
//! its own `Session` and drops it when done.

pub mod schema;
pub mod session;

pub use session::{Session, SessionProvider};
