//! Database abstraction layer.
//!
//! This module provides trait-based abstractions for data access,
//! allowing different storage backends (in-memory, JSON files, SQLite)
//! to be swapped without changing planner logic.
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error types
//! - `models`: Domain entities (Request, Task)
//! - `repository`: Trait definitions for data access
//! - `memory`, `json_file`, `sqlite`: Backend implementations

mod error;
pub mod json_file;
pub mod memory;
mod models;
mod repository;
pub mod sqlite;
pub mod utils;

#[cfg(test)]
mod memory_test;
#[cfg(test)]
mod models_test;

pub use error::{DbError, DbResult};
pub use json_file::JsonFileDatabase;
pub use memory::MemoryDatabase;
pub use models::*;
pub use repository::*;
pub use sqlite::SqliteDatabase;
