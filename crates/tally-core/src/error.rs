//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::PostId;

/// Vote errors - failures of a reconciliation or a projection read.
#[derive(Debug, Error)]
pub enum VoteError {
    #[error("You must be logged in to vote")]
    Unauthenticated,

    #[error("Invalid vote value: {0} (expected 1 or -1)")]
    InvalidValue(i16),

    #[error("Found {count} votes for post {post_id} by user {user_id}, expected at most one")]
    RaceAnomaly {
        post_id: PostId,
        user_id: Uuid,
        count: usize,
    },

    #[error(transparent)]
    Store(#[from] RepoError),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Stored row is invalid: {0}")]
    InvalidData(String),
}
