//! Registered account.

use serde::{Deserialize, Serialize};

use customshop_core::{Email, PlainPassword};

use super::User;

/// An account created through registration.
///
/// Kept in its own collection, separate from the live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    /// Display name.
    pub username: String,
    /// Account email, trimmed and lower-cased at registration.
    pub email: Email,
    /// Password as typed (trimmed), kept in plain text.
    pub password: PlainPassword,
}

impl RegisteredUser {
    /// The session identity for this account, without the password.
    #[must_use]
    pub fn identity(&self) -> User {
        User {
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}
