//! SQLite storage for the commissions dashboard.
//!
//! This crate is the only place where Diesel is used. It implements the
//! repository traits of `commissions-core` and contains:
//! - Connection pooling and pragmas
//! - Embedded Diesel migrations
//! - The single-writer actor every mutation goes through
//! - Database row types and their conversion to domain models
//!
//! ```text
//!     commissions-core (domain, traits)
//!                  │
//!                  ▼
//!     commissions-storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod proposals;
pub mod schema;

pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

pub use errors::{IntoCore, StorageError};

pub use commissions_core::errors::{DatabaseError, Error, Result};
