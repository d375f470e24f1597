//! Site settings repository.

use super::{RepositoryError, keys};
use crate::models::{SettingsPatch, SiteSettings};
use crate::store::Storage;

/// Repository for the single settings record.
#[derive(Debug)]
pub struct SettingsRepository {
    storage: Storage,
    settings: SiteSettings,
}

impl SettingsRepository {
    /// Hydrate the effective settings: defaults overridden by the stored
    /// record.
    #[must_use]
    pub fn load(storage: Storage) -> Self {
        let stored = storage.load_json(keys::SETTINGS);
        let settings = SiteSettings::from_stored(stored.as_ref());
        Self { storage, settings }
    }

    /// The effective settings.
    #[must_use]
    pub const fn current(&self) -> &SiteSettings {
        &self.settings
    }

    /// Merge `patch` into the settings and persist. Patches are never
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if persisting fails; the merged
    /// settings stay in memory.
    pub fn update(&mut self, patch: SettingsPatch) -> Result<(), RepositoryError> {
        self.settings.apply(patch);
        self.persist()
    }

    /// Write the settings to the store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the write fails.
    pub fn persist(&self) -> Result<(), RepositoryError> {
        self.storage.save_json(keys::SETTINGS, &self.settings)?;
        Ok(())
    }
}
