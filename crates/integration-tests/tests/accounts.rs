//! Integration tests for registration, login and view routing.

#![allow(clippy::unwrap_used)]

use customshop_integration_tests::{ADMIN_EMAIL, TestShop, memory_shop, registration};
use customshop_storefront::models::ViewMode;
use customshop_storefront::routes::{Route, resolve_route, show_mode_toggle};
use customshop_storefront::services::auth::{AuthError, resolve_admin};
use customshop_storefront::store::MemoryStore;
use customshop_storefront::AppError;

fn auth_error(result: Result<impl Sized, AppError>) -> AuthError {
    match result {
        Err(AppError::Auth(e)) => e,
        Err(other) => panic!("expected an auth error, got {other:?}"),
        Ok(_) => panic!("expected an auth error, got success"),
    }
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn test_duplicate_email_rejected_regardless_of_case() {
    let (mut state, _) = memory_shop(MemoryStore::new());
    state.register(&registration("jane@example.com", "pass")).unwrap();

    for variant in ["JANE@example.com", "  jane@EXAMPLE.com ", "Jane@Example.Com"] {
        let err = auth_error(state.register(&registration(variant, "other")));
        assert!(matches!(err, AuthError::EmailTaken), "{variant}");
    }
    assert_eq!(state.registered_users().len(), 1);
}

#[test]
fn test_short_password_changes_nothing() {
    let (mut state, store) = memory_shop(MemoryStore::new());
    let err = auth_error(state.register(&registration("jane@example.com", " abc ")));
    assert!(matches!(err, AuthError::PasswordTooShort { min: 4 }));
    assert!(state.current_user().is_none());
    assert!(state.registered_users().is_empty());
    assert_eq!(store.writes(), 0);
}

#[test]
fn test_register_logs_in() {
    let (mut state, _) = memory_shop(MemoryStore::new());
    let user = state.register(&registration("jane@example.com", "pass")).unwrap();
    assert_eq!(user.username, "Tester");
    assert_eq!(resolve_route(&state), Route::Customer);
}

// =============================================================================
// Login
// =============================================================================

#[test]
fn test_login_password_rules() {
    let shop = TestShop::new().unwrap();
    {
        let mut state = shop.open().unwrap();
        state.register(&registration("jane@example.com", "Secret")).unwrap();
        state.logout().unwrap();
    }

    let mut state = shop.open().unwrap();
    assert!(state.login("jane@example.com", "  Secret  ").is_ok());
    state.logout().unwrap();

    let err = auth_error(state.login("jane@example.com", "secret"));
    assert!(matches!(err, AuthError::WrongCredentials));
    assert!(state.current_user().is_none());

    let err = auth_error(state.login("nobody@example.com", "Secret"));
    assert!(matches!(err, AuthError::AccountNotFound));

    assert!(state.login(" JANE@Example.com ", "Secret").is_ok());
}

// =============================================================================
// Administrator
// =============================================================================

#[test]
fn test_resolve_admin_folds_case_and_whitespace() {
    let (mut state, _) = memory_shop(MemoryStore::new());
    let user = state
        .register(&registration(" Admin@Shop.COM ", "pass"))
        .unwrap()
        .clone();
    assert!(resolve_admin(Some(&user), ADMIN_EMAIL));
    assert!(state.is_admin());
    assert!(!resolve_admin(None, ADMIN_EMAIL));
}

#[test]
fn test_admin_lands_on_admin_view_and_can_toggle() {
    let (mut state, _) = memory_shop(MemoryStore::new());
    assert_eq!(resolve_route(&state), Route::Auth);

    state.register(&registration(ADMIN_EMAIL, "pass")).unwrap();
    assert_eq!(resolve_route(&state), Route::Admin);
    assert!(show_mode_toggle(&state));

    state.set_view_mode(ViewMode::Customer).unwrap();
    assert_eq!(resolve_route(&state), Route::Customer);
    state.set_view_mode(ViewMode::Admin).unwrap();
    assert_eq!(resolve_route(&state), Route::Admin);

    state.logout().unwrap();
    assert_eq!(resolve_route(&state), Route::Auth);
    assert_eq!(state.view_mode(), ViewMode::Customer);
}

#[test]
fn test_customer_cannot_enter_admin_view() {
    let (mut state, _) = memory_shop(MemoryStore::new());
    state.register(&registration("jane@example.com", "pass")).unwrap();

    assert!(matches!(
        state.set_view_mode(ViewMode::Admin),
        Err(AppError::Forbidden(_))
    ));
    assert_eq!(resolve_route(&state), Route::Customer);
    assert!(!show_mode_toggle(&state));
}
