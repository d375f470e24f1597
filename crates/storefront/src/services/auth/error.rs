//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
///
/// None of these leave any repository changed.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The address is not a usable email.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] customshop_core::EmailError),

    /// No registered account has this email.
    #[error("account not found")]
    AccountNotFound,

    /// The account exists but the password does not match.
    #[error("wrong credentials")]
    WrongCredentials,

    /// Registration with an email that already has an account.
    #[error("email already registered")]
    EmailTaken,

    /// Registration password shorter than the minimum.
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum length, in characters.
        min: usize,
    },

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// Message suitable for showing to the person at the keyboard.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidEmail(_) => "Please enter a valid email address.".to_owned(),
            Self::AccountNotFound => {
                "No account found with this email. Please register.".to_owned()
            }
            Self::WrongCredentials => "Incorrect password.".to_owned(),
            Self::EmailTaken => "This email is already in use.".to_owned(),
            Self::PasswordTooShort { min } => {
                format!("Password must be at least {min} characters.")
            }
            Self::Repository(_) => "Something went wrong. Please try again.".to_owned(),
        }
    }
}
