//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::session::SessionError;

/// Errors that can occur during registration and sign-in.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required form field was left blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] petshop_core::EmailError),

    /// Wrong email or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Sign-in attempted before anyone registered.
    #[error("no users registered")]
    NoRegisteredUsers,

    /// The email (ignoring case) is already taken.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Session transition failed.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Storage error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
