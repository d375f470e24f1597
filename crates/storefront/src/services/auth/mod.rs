//! Authentication service.
//!
//! Email and password accounts, plus the single authorization rule: the
//! administrator is whoever is logged in with the configured admin email.

mod error;

pub use error::AuthError;

use customshop_core::{Email, PlainPassword, normalize_email};

use crate::db::{RepositoryError, UserRepository, log_store_failure};
use crate::models::{RegisteredUser, User};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Username given to the administrator when registration leaves it blank.
pub const DEFAULT_ADMIN_USERNAME: &str = "Administrator";

/// Username given to everyone else when registration leaves it blank.
pub const DEFAULT_CUSTOMER_USERNAME: &str = "Customer";

/// Whether `session` belongs to the administrator.
///
/// Both addresses are trimmed and case-folded before comparison. No session
/// means no administrator.
#[must_use]
pub fn resolve_admin(session: Option<&User>, admin_email: &str) -> bool {
    session.is_some_and(|user| normalize_email(user.email.as_str()) == normalize_email(admin_email))
}

/// Input of the registration form.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Authentication service.
///
/// Borrows the account repository for the duration of one operation.
pub struct AuthService<'a> {
    users: &'a mut UserRepository,
    admin_email: &'a str,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a mut UserRepository, admin_email: &'a str) -> Self {
        Self { users, admin_email }
    }

    /// Check credentials and return the identity to log in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AccountNotFound` if no account has this email.
    /// Returns `AuthError::WrongCredentials` if the password does not match.
    pub fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let account = self
            .users
            .find_by_email(email)
            .ok_or(AuthError::AccountNotFound)?;

        if !account.password.verify(password) {
            tracing::info!(email = %account.email, "login rejected: wrong password");
            return Err(AuthError::WrongCredentials);
        }

        tracing::info!(email = %account.email, "login succeeded");
        Ok(account.identity())
    }

    /// Create an account and return the identity to log in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email cannot be parsed.
    /// Returns `AuthError::EmailTaken` if an account already uses the email.
    /// Returns `AuthError::PasswordTooShort` if the trimmed password is too
    /// short.
    pub fn register(&mut self, form: &RegistrationForm) -> Result<User, AuthError> {
        let email = Email::parse_normalized(&form.email)?;

        if self.users.find_by_email(email.as_str()).is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password = PlainPassword::new(&form.password);
        if password.char_len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        let username = match form.username.trim() {
            "" if email.matches(self.admin_email) => DEFAULT_ADMIN_USERNAME.to_owned(),
            "" => DEFAULT_CUSTOMER_USERNAME.to_owned(),
            name => name.to_owned(),
        };

        let account = RegisteredUser {
            username,
            email,
            password,
        };
        let identity = account.identity();

        log_store_failure("registered_users", self.users.insert(account)).map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::EmailTaken,
            other => AuthError::Repository(other),
        })?;

        tracing::info!(email = %identity.email, "account registered");
        Ok(identity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::{MemoryStore, Storage};

    const ADMIN: &str = "admin@shop.com";

    fn repo() -> (UserRepository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (UserRepository::load(Storage::shared(store.clone())), store)
    }

    fn form(username: &str, email: &str, password: &str) -> RegistrationForm {
        RegistrationForm {
            username: username.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    fn user(email: &str) -> User {
        User {
            username: "x".to_owned(),
            email: Email::parse(email).unwrap(),
        }
    }

    #[test]
    fn test_resolve_admin() {
        assert!(resolve_admin(Some(&user(" Admin@Shop.COM ")), "admin@shop.com"));
        assert!(resolve_admin(Some(&user("admin@shop.com")), "  ADMIN@shop.com"));
        assert!(!resolve_admin(Some(&user("jane@shop.com")), ADMIN));
        assert!(!resolve_admin(None, ADMIN));
    }

    #[test]
    fn test_register_then_login() {
        let (mut users, _) = repo();
        let registered = AuthService::new(&mut users, ADMIN)
            .register(&form("Jane", " Jane@Example.com ", " pass "))
            .unwrap();
        assert_eq!(registered.email.as_str(), "jane@example.com");

        let auth = AuthService::new(&mut users, ADMIN);
        let logged_in = auth.login("JANE@example.com", "pass").unwrap();
        assert_eq!(logged_in, registered);
    }

    #[test]
    fn test_register_same_email_twice_fails() {
        let (mut users, store) = repo();
        let mut auth = AuthService::new(&mut users, ADMIN);
        auth.register(&form("Jane", "jane@example.com", "pass")).unwrap();

        let err = auth
            .register(&form("Other", "  JANE@EXAMPLE.COM", "other"))
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_register_short_password_fails() {
        let (mut users, store) = repo();
        let err = AuthService::new(&mut users, ADMIN)
            .register(&form("Jane", "jane@example.com", "  abc  "))
            .unwrap_err();
        assert!(matches!(err, AuthError::PasswordTooShort { min: 4 }));
        assert_eq!(err.user_message(), "Password must be at least 4 characters.");
        assert!(users.list().is_empty());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_register_invalid_email_fails() {
        let (mut users, _) = repo();
        let err = AuthService::new(&mut users, ADMIN)
            .register(&form("Jane", "jane.example.com", "pass"))
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));
    }

    #[test]
    fn test_blank_username_defaults() {
        let (mut users, _) = repo();
        let mut auth = AuthService::new(&mut users, ADMIN);
        let admin = auth.register(&form("  ", "ADMIN@shop.com", "pass")).unwrap();
        let customer = auth.register(&form("", "bob@shop.com", "pass")).unwrap();
        assert_eq!(admin.username, DEFAULT_ADMIN_USERNAME);
        assert_eq!(customer.username, DEFAULT_CUSTOMER_USERNAME);
    }

    #[test]
    fn test_login_unknown_account() {
        let (mut users, _) = repo();
        let err = AuthService::new(&mut users, ADMIN)
            .login("ghost@example.com", "pass")
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountNotFound));
    }

    #[test]
    fn test_login_password_whitespace_and_case() {
        let (mut users, _) = repo();
        AuthService::new(&mut users, ADMIN)
            .register(&form("Jane", "jane@example.com", "Secret"))
            .unwrap();

        let auth = AuthService::new(&mut users, ADMIN);
        assert!(auth.login("jane@example.com", "  Secret\t").is_ok());
        assert!(matches!(
            auth.login("jane@example.com", "secret"),
            Err(AuthError::WrongCredentials)
        ));
    }
}
