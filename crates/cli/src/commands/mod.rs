//! Subcommand implementations.
//!
//! Each command takes the loaded [`AppState`] and a writer for its output.
//! Commands that only make sense in the admin panel check for the
//! administrator first; everything except `register`, `login` and `view`
//! needs someone logged in.

pub mod account;
pub mod catalog;
pub mod chat;
pub mod orders;
pub mod settings;

use thiserror::Error;

use customshop_storefront::config::ConfigError;
use customshop_storefront::models::User;
use customshop_storefront::{AppError, AppState};

/// Errors from running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("not logged in")]
    NotLoggedIn,

    #[error("administrator only")]
    AdminOnly,

    #[error("product not found: {0}")]
    ProductNotFound(String),

    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("chat is turned off")]
    ChatDisabled,

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Message printed to the terminal.
    pub fn user_message(&self) -> String {
        match self {
            Self::App(e) => e.user_message(),
            Self::Config(e) => e.to_string(),
            Self::NotLoggedIn => {
                "Please log in first (`customshop login` or `customshop register`).".to_owned()
            }
            Self::AdminOnly => "Only the administrator can do that.".to_owned(),
            Self::ProductNotFound(id) => format!("No product with id {id}."),
            Self::OrderNotFound(id) => format!("No order with id {id}."),
            Self::InvalidSetting(key) => {
                format!("Unknown setting or invalid value for \"{key}\".")
            }
            Self::ChatDisabled => "The shop assistant is turned off.".to_owned(),
            Self::Io(e) => format!("Could not write output: {e}"),
        }
    }
}

/// The logged-in user, or `NotLoggedIn`.
fn require_user(state: &AppState) -> Result<&User, CliError> {
    state.current_user().ok_or(CliError::NotLoggedIn)
}

/// Succeeds only for the administrator.
fn require_admin(state: &AppState) -> Result<(), CliError> {
    require_user(state)?;
    if state.is_admin() {
        Ok(())
    } else {
        Err(CliError::AdminOnly)
    }
}
