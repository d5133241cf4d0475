//! Database error types.
//!
//! This module provides abstracted error types for database operations.
//! It uses miette for fancy diagnostic output and thiserror for derive macros.
//! The error types are storage-backend agnostic.

use miette::Diagnostic;
use thiserror::Error;

/// Database operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Entity not found: {entity_type} with id '{id}'")]
    #[diagnostic(code(taskplan::db::not_found))]
    NotFound { entity_type: String, id: String },

    #[error("Database error: {message}")]
    #[diagnostic(code(taskplan::db::database_error))]
    Database { message: String },

    #[error("Migration error: {message}")]
    #[diagnostic(code(taskplan::db::migration_error))]
    Migration { message: String },

    #[error("Connection error: {message}")]
    #[diagnostic(code(taskplan::db::connection_error))]
    Connection { message: String },

    #[error("IO error on {path}: {message}")]
    #[diagnostic(
        code(taskplan::db::io_error),
        help("Check that the data directory exists and is writable")
    )]
    Io { path: String, message: String },

    #[error("Serialization error: {message}")]
    #[diagnostic(code(taskplan::db::serialization_error))]
    Serialization { message: String },
}

impl DbError {
    pub(crate) fn request_not_found(id: &str) -> Self {
        DbError::NotFound {
            entity_type: "Request".to_string(),
            id: id.to_string(),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
