//! Persistence error types.
//!
//! Repositories return these instead of raw `sqlx::Error` where unique
//! constraint violations carry business meaning.

use thiserror::Error;

/// Errors from team repository operations.
#[derive(Debug, Error)]
pub enum TeamError {
    #[error("A team with this title already exists")]
    TitleTaken,

    #[error("This join identifier is already in use")]
    IdentifierTaken,

    #[error("Team not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Errors from membership repository operations.
#[derive(Debug, Error)]
pub enum MembershipError {
    #[error("Membership or join request not found")]
    NotFound,

    #[error("User is already a member of this team")]
    AlreadyMember,

    #[error("User already has a pending join request for this team")]
    AlreadyPending,

    #[error("Membership already exists")]
    DuplicateMembership,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Returns the violated constraint name when the error is a PostgreSQL
/// unique violation (SQLSTATE 23505), `None` otherwise.
pub fn unique_violation(err: &sqlx::Error) -> Option<String> {
    if let sqlx::Error::Database(db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            return db_err.constraint().map(|c| c.to_string());
        }
    }
    None
}
