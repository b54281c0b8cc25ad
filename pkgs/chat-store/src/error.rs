//! Error types for store operations

use sea_orm::DbErr;
use thiserror::Error;

use crate::Table;

/// Errors returned by the record store and the managers built on it
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{table} record not found: {id}")]
    NotFound { table: Table, id: String },
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Store is not initialized")]
    StoreUnavailable,
    #[error("Invalid value '{value}' in {table}.{column}")]
    Decode {
        table: Table,
        column: &'static str,
        value: String,
    },
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn not_found(table: Table, id: impl Into<String>) -> Self {
        Self::NotFound {
            table,
            id: id.into(),
        }
    }

    /// Whether this error means the target record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
