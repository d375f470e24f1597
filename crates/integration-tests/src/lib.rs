//! Integration tests for CustomShop.
//!
//! The tests drive [`AppState`] end to end over real store backends: a
//! [`FileStore`] in a temporary directory for restart behaviour, and a
//! shared [`MemoryStore`] when a test needs to count writes or seed raw
//! values.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p customshop-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use customshop_storefront::services::auth::RegistrationForm;
use customshop_storefront::store::{FileStore, KeyValueStore, MemoryStore, Storage, StoreError};
use customshop_storefront::{AppState, ShopConfig};

/// Administrator email used by every test shop.
pub const ADMIN_EMAIL: &str = "admin@shop.com";

/// Configuration with [`ADMIN_EMAIL`] as administrator.
#[must_use]
pub fn config() -> ShopConfig {
    ShopConfig {
        admin_email: ADMIN_EMAIL.to_owned(),
        ..ShopConfig::default()
    }
}

/// Registration form with a fixed display name.
#[must_use]
pub fn registration(email: &str, password: &str) -> RegistrationForm {
    RegistrationForm {
        username: "Tester".to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
    }
}

/// A shop persisted to a temporary directory.
///
/// Each call to [`TestShop::open`] is a fresh start of the application over
/// the same files.
pub struct TestShop {
    dir: TempDir,
    config: ShopConfig,
}

impl TestShop {
    /// Create an empty data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> io::Result<Self> {
        Self::with_config(config())
    }

    /// Create an empty data directory for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn with_config(mut config: ShopConfig) -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        config.data_dir = dir.path().to_path_buf();
        Ok(Self { dir, config })
    }

    /// The data directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Start the application over the data directory.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the directory cannot be opened.
    pub fn open(&self) -> Result<AppState, StoreError> {
        let store = FileStore::open(self.config.data_dir.clone())?;
        Ok(AppState::load(Storage::new(store), &self.config))
    }

    /// Overwrite the raw stored text for `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be written.
    pub fn write_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        FileStore::open(self.config.data_dir.clone())?.save(key, value)
    }

    /// Raw stored text for `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read.
    pub fn read_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        FileStore::open(self.config.data_dir.clone())?.load(key)
    }
}

/// Start the application over a shared in-memory store.
///
/// The returned handle sees every write the state makes.
#[must_use]
pub fn memory_shop(store: MemoryStore) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(store);
    let backend: Arc<dyn KeyValueStore> = store.clone();
    let state = AppState::load(Storage::shared(backend), &config());
    (state, store)
}
