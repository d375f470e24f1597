//! Session repository: who is logged in on this device.

use super::{RepositoryError, keys};
use crate::models::User;
use crate::store::Storage;

/// Repository for the logged-in session.
#[derive(Debug)]
pub struct SessionRepository {
    storage: Storage,
    user: Option<User>,
}

impl SessionRepository {
    /// Hydrate the session. A malformed record means nobody is logged in.
    #[must_use]
    pub fn load(storage: Storage) -> Self {
        let user = storage.load_as::<User>(keys::SESSION);
        Self { storage, user }
    }

    /// The logged-in user, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Log `user` in and persist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if persisting fails; the session is
    /// still set in memory.
    pub fn set(&mut self, user: User) -> Result<(), RepositoryError> {
        self.user = Some(user);
        self.persist()
    }

    /// Log out and remove the stored session.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the stored session cannot be
    /// removed.
    pub fn clear(&mut self) -> Result<(), RepositoryError> {
        self.user = None;
        self.persist()
    }

    /// Write the session to the store, or remove it when logged out.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the write fails.
    pub fn persist(&self) -> Result<(), RepositoryError> {
        match &self.user {
            Some(user) => self.storage.save_json(keys::SESSION, user)?,
            None => self.storage.remove(keys::SESSION)?,
        }
        Ok(())
    }
}
