//! Registered-account repository.
//!
//! Accounts are stored with their password as typed. This is a known
//! weakness of the storage format; [`customshop_core::PlainPassword`] at
//! least keeps it out of logs.

use super::{RepositoryError, decode_collection, keys};
use crate::models::RegisteredUser;
use crate::store::Storage;

/// Repository for registered accounts.
#[derive(Debug)]
pub struct UserRepository {
    storage: Storage,
    users: Vec<RegisteredUser>,
}

impl UserRepository {
    /// Hydrate accounts from the store. Absent or malformed data yields none.
    #[must_use]
    pub fn load(storage: Storage) -> Self {
        let users = decode_collection::<RegisteredUser>(
            keys::REGISTERED_USERS,
            storage.load_json(keys::REGISTERED_USERS),
        )
        .unwrap_or_default();
        Self { storage, users }
    }

    /// All accounts, in registration order.
    #[must_use]
    pub fn list(&self) -> &[RegisteredUser] {
        &self.users
    }

    /// Find an account by email, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<&RegisteredUser> {
        self.users.iter().find(|u| u.email.matches(email))
    }

    /// Append an account and persist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already
    /// registered. Returns `RepositoryError::Store` if persisting fails.
    pub fn insert(&mut self, user: RegisteredUser) -> Result<(), RepositoryError> {
        if self.find_by_email(user.email.as_str()).is_some() {
            return Err(RepositoryError::Conflict(format!(
                "email {} already registered",
                user.email
            )));
        }
        self.users.push(user);
        self.persist()
    }

    /// Write all accounts to the store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the write fails.
    pub fn persist(&self) -> Result<(), RepositoryError> {
        self.storage.save_json(keys::REGISTERED_USERS, &self.users)?;
        Ok(())
    }
}
