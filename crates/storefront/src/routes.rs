//! View routing.
//!
//! Decides which top-level view to render from the current state. Routing
//! only reads state.

use crate::models::ViewMode;
use crate::state::AppState;

/// Top-level view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Login and registration.
    Auth,
    /// Admin panel: catalog, orders, settings.
    Admin,
    /// Shop front.
    Customer,
}

/// The view to render for `state`.
#[must_use]
pub fn resolve_route(state: &AppState) -> Route {
    if state.current_user().is_none() {
        Route::Auth
    } else if state.is_admin() && state.view_mode() == ViewMode::Admin {
        Route::Admin
    } else {
        Route::Customer
    }
}

/// Whether the customer/admin toggle is offered.
#[must_use]
pub fn show_mode_toggle(state: &AppState) -> bool {
    state.is_admin()
}
