//! Authentication service.
//!
//! Registration and email/password sign-in against the `users` collection.
//! Credentials are compared as stored; there is no hashing in this local
//! store.

mod error;

pub use error::AuthError;

use petshop_core::Email;

use crate::db::{Repository, Users};
use crate::models::User;
use crate::services::session::SessionManager;

/// Authentication service.
///
/// Borrows the users repository and the session manager from
/// [`AppState`](crate::state::AppState).
pub struct AuthService<'a> {
    users: &'a Repository<Users>,
    session: &'a SessionManager,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a Repository<Users>, session: &'a SessionManager) -> Self {
        Self { users, session }
    }

    /// Register a new user.
    ///
    /// The email check and the append run as one repository transform, so two
    /// concurrent registrations of the same address cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if any field is blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered
    /// (case-insensitive); the existing record is left untouched.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let name = name.trim();
        require("name", name)?;
        require("email", email.trim())?;
        require("password", password)?;

        let user = User {
            name: name.to_owned(),
            email: Email::parse(email)?,
            password: password.to_owned(),
        };

        let user = self
            .users
            .transform(|users| {
                if users.iter().any(|u| u.has_email(&user.email)) {
                    return Err(AuthError::UserAlreadyExists);
                }
                users.push(user.clone());
                Ok(user)
            })
            .await?;

        tracing::info!(email = %user.email, "Registered user");
        Ok(user)
    }

    /// Check credentials and log the matching user in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoRegisteredUsers` if nobody has registered yet.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong,
    /// including an email that is not well-formed.
    /// Returns `AuthError::Session` if the session cannot be persisted.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        require("email", email.trim())?;
        require("password", password)?;

        let users = self.users.load().await?;
        if users.is_empty() {
            return Err(AuthError::NoRegisteredUsers);
        }
        // A malformed address cannot belong to any account
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let user = users
            .into_iter()
            .find(|u| u.has_email(&email) && u.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        self.session.login(user.clone()).await?;
        Ok(user)
    }

    /// Log the current user out.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` if the stored session cannot be removed.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.session.logout().await?;
        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> Result<(), AuthError> {
    if value.is_empty() {
        return Err(AuthError::MissingField(field));
    }
    Ok(())
}
