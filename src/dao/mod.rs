//! Authoritative in-process persistence layer for game entities.

/// The entity store and its seeding logic.
pub mod entity_store;
/// Entity definitions shared across layers.
pub mod models;

use thiserror::Error;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the entity store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated.
    #[error("duplicate {field}: `{value}` already exists")]
    Duplicate {
        /// Name of the constrained field.
        field: &'static str,
        /// Value that collided with an existing record.
        value: String,
    },
    /// A referenced entity does not exist.
    #[error("{entity} `{id}` not found")]
    NotFound {
        /// Kind of the missing entity.
        entity: &'static str,
        /// Identifier that failed to resolve.
        id: String,
    },
    /// A field failed shape or range validation.
    #[error("invalid {field}: {constraint}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable description of the violated constraint.
        constraint: String,
    },
    /// An internal index disagrees with its primary table. Unrecoverable.
    #[error("store corrupted: {0}")]
    Corrupted(String),
}
