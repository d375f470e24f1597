//! Session commands: register, login, logout, whoami, view.

use std::io::Write;

use customshop_storefront::AppState;
use customshop_storefront::models::ViewMode;
use customshop_storefront::services::auth::RegistrationForm;

use super::{CliError, require_user};
use crate::render;

/// Create an account, log in, and show the landing view.
pub fn register(
    state: &mut AppState,
    out: &mut impl Write,
    username: String,
    email: String,
    password: String,
) -> Result<(), CliError> {
    let form = RegistrationForm {
        username,
        email,
        password,
    };
    let user = state.register(&form)?;
    writeln!(out, "Welcome, {}!", user.username)?;
    render::route(out, state)?;
    Ok(())
}

/// Log in and show the landing view.
pub fn login(
    state: &mut AppState,
    out: &mut impl Write,
    email: &str,
    password: &str,
) -> Result<(), CliError> {
    let user = state.login(email, password)?;
    writeln!(out, "Welcome back, {}!", user.username)?;
    render::route(out, state)?;
    Ok(())
}

pub fn logout(state: &mut AppState, out: &mut impl Write) -> Result<(), CliError> {
    if state.current_user().is_none() {
        writeln!(out, "Not logged in.")?;
        return Ok(());
    }
    state.logout()?;
    writeln!(out, "Logged out.")?;
    Ok(())
}

pub fn whoami(state: &AppState, out: &mut impl Write) -> Result<(), CliError> {
    let user = require_user(state)?;
    render::user(out, user, state.is_admin())?;
    Ok(())
}

/// Render the routed view, switching view mode first if asked.
///
/// View mode lasts for this invocation only.
pub fn view(
    state: &mut AppState,
    out: &mut impl Write,
    mode: Option<ViewMode>,
) -> Result<(), CliError> {
    if let Some(mode) = mode {
        require_user(state)?;
        state.set_view_mode(mode)?;
    }
    render::route(out, state)?;
    Ok(())
}
