//! Repositories over the persistent store.
//!
//! # Keys
//!
//! - `cs_user` - logged-in session
//! - `cs_products` - catalog, newest first
//! - `cs_orders` - orders, newest first
//! - `cs_settings` - site settings
//! - `cs_registered_users` - registered accounts
//!
//! Each repository hydrates once from its key and afterwards keeps the
//! in-memory copy authoritative. Every mutation rewrites the whole entity.
//! Reads never fail: absent or malformed data falls back to the entity's
//! default and is logged.

pub mod catalog;
pub mod orders;
pub mod session;
pub mod settings;
pub mod users;

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::store::StoreError;

pub use catalog::{CatalogRepository, CatalogSeed};
pub use orders::OrderRepository;
pub use session::SessionRepository;
pub use settings::SettingsRepository;
pub use users::UserRepository;

/// Store keys, one per entity.
pub mod keys {
    /// Logged-in session.
    pub const SESSION: &str = "cs_user";
    /// Product catalog.
    pub const PRODUCTS: &str = "cs_products";
    /// Orders.
    pub const ORDERS: &str = "cs_orders";
    /// Site settings.
    pub const SETTINGS: &str = "cs_settings";
    /// Registered accounts.
    pub const REGISTERED_USERS: &str = "cs_registered_users";

    /// Every key the storefront writes.
    pub const ALL: [&str; 5] = [SESSION, PRODUCTS, ORDERS, SETTINGS, REGISTERED_USERS];
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The store could not be written.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Constraint violation (e.g., duplicate id).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Decode a stored collection.
///
/// Returns `None` when `value` is absent or not an array. Elements that do
/// not decode as `T` are dropped one by one, so a single bad record does not
/// cost the rest of the collection.
pub(crate) fn decode_collection<T: DeserializeOwned>(key: &str, value: Option<Value>) -> Option<Vec<T>> {
    let items = match value? {
        Value::Array(items) => items,
        other => {
            tracing::warn!(key, kind = json_kind(&other), "stored collection is not an array");
            return None;
        }
    };

    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key, index, error = %e, "dropping malformed record");
                None
            }
        })
        .collect();

    if decoded.len() < total {
        tracing::warn!(key, kept = decoded.len(), total, "recovered partially malformed collection");
    }
    Some(decoded)
}

/// Keep the first record for each id, dropping later repeats with a warning.
pub(crate) fn dedupe_by_id<T>(key: &str, records: Vec<T>, id: impl Fn(&T) -> &str) -> Vec<T> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let record_id = id(record);
            let first = seen.insert(record_id.to_owned());
            if !first {
                tracing::warn!(key, id = record_id, "dropping record with duplicate id");
            }
            first
        })
        .collect()
}

/// Log and swallow a failed write, passing other errors through.
///
/// The in-memory copy stays authoritative when the store rejects a write;
/// the next successful write of the same entity brings it back in sync.
pub(crate) fn log_store_failure(entity: &str, result: Result<(), RepositoryError>) -> Result<(), RepositoryError> {
    match result {
        Err(RepositoryError::Store(e)) => {
            tracing::error!(entity, error = %e, "failed to persist, keeping in-memory state");
            Ok(())
        }
        other => other,
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
