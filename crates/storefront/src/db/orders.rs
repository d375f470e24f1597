//! Order repository.
//!
//! Orders are append-only records: they are created and deleted, never
//! edited.

use customshop_core::{OrderId, Price};

use super::{RepositoryError, decode_collection, dedupe_by_id, keys};
use crate::models::Order;
use crate::store::Storage;

/// Repository for orders, newest first.
#[derive(Debug)]
pub struct OrderRepository {
    storage: Storage,
    orders: Vec<Order>,
}

impl OrderRepository {
    /// Hydrate orders from the store. Absent or malformed data yields none;
    /// repeated ids keep their first order.
    #[must_use]
    pub fn load(storage: Storage) -> Self {
        let orders = decode_collection::<Order>(keys::ORDERS, storage.load_json(keys::ORDERS))
            .map(|orders| dedupe_by_id(keys::ORDERS, orders, |o| o.id.as_str()))
            .unwrap_or_default();
        tracing::debug!(count = orders.len(), "orders loaded");
        Self { storage, orders }
    }

    /// All orders, newest first.
    #[must_use]
    pub fn list(&self) -> &[Order] {
        &self.orders
    }

    /// Look up an order by id.
    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    /// Whether an order with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.orders.iter().any(|o| o.id.as_str() == id)
    }

    /// Sum of all order prices.
    #[must_use]
    pub fn total_revenue(&self) -> Price {
        self.orders.iter().map(|o| o.price).sum()
    }

    /// Prepend an order and persist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id is already used.
    /// Returns `RepositoryError::Store` if persisting fails; the order stays
    /// in memory.
    pub fn add(&mut self, order: Order) -> Result<(), RepositoryError> {
        if self.contains(order.id.as_str()) {
            return Err(RepositoryError::Conflict(format!("order id {} already exists", order.id)));
        }
        self.orders.insert(0, order);
        self.persist()
    }

    /// Remove the order with this id and persist. Returns whether anything
    /// was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if persisting fails.
    pub fn delete(&mut self, id: &OrderId) -> Result<bool, RepositoryError> {
        let before = self.orders.len();
        self.orders.retain(|o| &o.id != id);
        let removed = self.orders.len() < before;
        self.persist()?;
        Ok(removed)
    }

    /// Write all orders to the store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the write fails.
    pub fn persist(&self) -> Result<(), RepositoryError> {
        self.storage.save_json(keys::ORDERS, &self.orders)?;
        Ok(())
    }
}
