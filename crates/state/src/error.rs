//! Unified error handling.
//!
//! Every layer has its own `thiserror` enum. [`Error`] wraps them all so a
//! front end can match on one type, classify it with [`Error::kind`] and show
//! [`Error::user_message`] without leaking storage details.

use thiserror::Error;

use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::kv::StoreError;
use crate::services::{AuthError, CartError, CatalogError, SessionError};

/// Application-level error type for the state layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Cart error: {0}")]
    Cart(#[from] CartError),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The store could not be read or written.
    Io,
    /// User input was rejected before any write.
    Validation,
    /// A stored value exists but does not decode.
    Corruption,
    /// The email is already registered.
    Duplicate,
    /// The addressed product or cart line does not exist.
    NotFound,
    /// Sign-in failed or the session is not ready.
    Session,
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Validation,
            Self::Store(_) => ErrorKind::Io,
            Self::Repository(e) => repository_kind(e),
            Self::Session(e) => session_kind(e),
            Self::Auth(e) => match e {
                AuthError::MissingField(_) | AuthError::InvalidEmail(_) => ErrorKind::Validation,
                AuthError::UserAlreadyExists => ErrorKind::Duplicate,
                AuthError::InvalidCredentials | AuthError::NoRegisteredUsers => ErrorKind::Session,
                AuthError::Session(e) => session_kind(e),
                AuthError::Repository(e) => repository_kind(e),
            },
            Self::Catalog(e) => match e {
                CatalogError::Validation(_) | CatalogError::InvalidRate(_) => ErrorKind::Validation,
                CatalogError::ProductNotFound(_) => ErrorKind::NotFound,
                CatalogError::Repository(e) => repository_kind(e),
            },
            Self::Cart(e) => match e {
                CartError::IndexOutOfRange { .. } => ErrorKind::NotFound,
                CartError::Pricing(_) => ErrorKind::Validation,
                CartError::Repository(e) => repository_kind(e),
            },
        }
    }

    /// Message suitable for an alert.
    ///
    /// Validation messages echo the problem so the user can fix the form;
    /// storage failures get a generic advisory.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Io => "Could not access saved data. Please try again.".to_string(),
            ErrorKind::Corruption => {
                "Saved data is damaged and could not be read.".to_string()
            }
            ErrorKind::Duplicate => "This email is already registered.".to_string(),
            ErrorKind::Validation | ErrorKind::NotFound | ErrorKind::Session => {
                self.detail_message()
            }
        }
    }

    fn detail_message(&self) -> String {
        match self {
            Self::Auth(AuthError::MissingField(_)) => "Please fill in all fields.".to_string(),
            Self::Auth(AuthError::InvalidEmail(_)) => "Invalid email address.".to_string(),
            Self::Auth(AuthError::InvalidCredentials) => "Incorrect email or password.".to_string(),
            Self::Auth(AuthError::NoRegisteredUsers) => "No users are registered yet.".to_string(),
            Self::Auth(AuthError::Session(SessionError::Initializing))
            | Self::Session(SessionError::Initializing) => {
                "Still loading, please try again in a moment.".to_string()
            }
            Self::Session(SessionError::NotLoggedIn) => "Please log in first.".to_string(),
            Self::Catalog(CatalogError::Validation(e)) => format!("Invalid product: {e}."),
            Self::Catalog(CatalogError::InvalidRate(e)) => format!("Invalid exchange rate: {e}."),
            Self::Catalog(CatalogError::ProductNotFound(_)) => "Product not found.".to_string(),
            Self::Cart(CartError::IndexOutOfRange { .. }) => {
                "That item is no longer in the cart.".to_string()
            }
            Self::Cart(CartError::Pricing(_)) => {
                "The cart total is too large to compute. Remove some items.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

const fn repository_kind(e: &RepositoryError) -> ErrorKind {
    match e {
        RepositoryError::Store(_) | RepositoryError::Serialization(_) => ErrorKind::Io,
        RepositoryError::DataCorruption { .. } => ErrorKind::Corruption,
    }
}

const fn session_kind(e: &SessionError) -> ErrorKind {
    match e {
        SessionError::Initializing | SessionError::NotLoggedIn => ErrorKind::Session,
        SessionError::Repository(e) => repository_kind(e),
    }
}

/// Result type alias for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
