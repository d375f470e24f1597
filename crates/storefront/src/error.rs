//! Application error type shared by the front-ends.

use thiserror::Error;

use crate::assistant::AssistantError;
use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::forms::FormError;
use crate::services::orders::OrderError;
use crate::store::StoreError;
use crate::surface::Surface;

/// Everything an operation on the storefront can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    /// Login or registration failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A form did not validate.
    #[error(transparent)]
    Form(#[from] FormError),

    /// An order could not be created.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// The current session may not do this.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// A previous assistant call on this surface is still running.
    #[error("{0:?} is busy")]
    Busy(Surface),

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Assistant could not be set up.
    #[error("assistant error: {0}")]
    Assistant(#[from] AssistantError),
}

impl AppError {
    /// Message suitable for showing to the person at the keyboard.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(e) => e.user_message(),
            Self::Form(e) => e.user_message(),
            Self::Order(e) => e.user_message(),
            Self::Forbidden(_) => "You are not allowed to do that.".to_owned(),
            Self::Busy(_) => "Please wait for the current request to finish.".to_owned(),
            Self::Repository(RepositoryError::Conflict(_)) => {
                "That record already exists.".to_owned()
            }
            Self::Repository(_) | Self::Store(_) => {
                "Your changes could not be saved.".to_owned()
            }
            Self::Config(e) => e.to_string(),
            Self::Assistant(_) => "The AI assistant could not be started.".to_owned(),
        }
    }
}
