//! User domain types.

use serde::{Deserialize, Serialize};

use petshop_core::Email;

/// A registered account, stored in the `users` collection.
///
/// The password is kept as entered; hashing is out of scope for this local
/// store. `Debug` is implemented manually to redact it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name.
    pub name: String,
    /// Login email; unique across users, compared case-insensitively.
    pub email: Email,
    /// Plain-text password.
    pub password: String,
}

impl User {
    /// Whether `email` identifies this user.
    #[must_use]
    pub fn has_email(&self, email: &Email) -> bool {
        self.email.same_identity(email)
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
