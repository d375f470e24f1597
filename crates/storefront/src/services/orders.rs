//! Order capture: customer checkout and simulated sales.

use rand::Rng;
use rand::seq::IndexedRandom;
use thiserror::Error;

use customshop_core::{IdGenerator, OrderId, ProductId};

use super::forms::{CheckoutForm, FormError};
use crate::db::{CatalogRepository, OrderRepository, RepositoryError, log_store_failure};
use crate::models::{Customer, Order, Product};

const SIMULATED_NAMES: [&str; 5] = [
    "Alice Martin",
    "Thomas Durand",
    "Sophie Bernard",
    "Nicolas Petit",
    "Emma Leroy",
];

const SIMULATED_ADDRESSES: [&str; 4] = [
    "12 Peace Street, 75002 Paris",
    "45 Foch Avenue, 69006 Lyon",
    "8 Commerce Street, 33000 Bordeaux",
    "102 Haussmann Boulevard, 75008 Paris",
];

/// Errors that can occur while creating an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// A sale was simulated on an empty catalog.
    #[error("no products to sell")]
    NoProducts,

    /// Checkout for a product that is not in the catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// The checkout form did not validate.
    #[error(transparent)]
    Invalid(#[from] FormError),

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl OrderError {
    /// Message suitable for showing to the person at the keyboard.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoProducts => "Add at least one product to simulate a sale!".to_owned(),
            Self::UnknownProduct(_) => "This product is no longer available.".to_owned(),
            Self::Invalid(e) => e.user_message(),
            Self::Repository(_) => "Something went wrong. Please try again.".to_owned(),
        }
    }
}

/// Order service.
///
/// Reads the catalog and appends to the order book.
pub struct OrderService<'a> {
    catalog: &'a CatalogRepository,
    orders: &'a mut OrderRepository,
    ids: &'a IdGenerator,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(
        catalog: &'a CatalogRepository,
        orders: &'a mut OrderRepository,
        ids: &'a IdGenerator,
    ) -> Self {
        Self { catalog, orders, ids }
    }

    /// Place an order for `product_id` with the customer's details.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::UnknownProduct` if the product is not in the
    /// catalog and `OrderError::Invalid` if the form does not validate.
    pub fn checkout(&mut self, product_id: &ProductId, form: &CheckoutForm) -> Result<Order, OrderError> {
        let catalog = self.catalog;
        let product = catalog
            .get(product_id)
            .ok_or_else(|| OrderError::UnknownProduct(product_id.clone()))?;
        let customer = form.validate()?;
        let order = self.record(product, customer)?;
        tracing::info!(order_id = %order.id, product_id = %product_id, "order placed");
        Ok(order)
    }

    /// Record a made-up order for a random product.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NoProducts` if the catalog is empty; nothing is
    /// recorded in that case.
    pub fn simulate_sale<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Order, OrderError> {
        let catalog = self.catalog;
        let product = catalog
            .list()
            .choose(rng)
            .ok_or(OrderError::NoProducts)?;
        let customer = simulated_customer(rng);
        let order = self.record(product, customer)?;
        tracing::info!(order_id = %order.id, "simulated sale recorded");
        Ok(order)
    }

    fn record(&mut self, product: &Product, customer: Customer) -> Result<Order, OrderError> {
        let orders = &*self.orders;
        let id: OrderId = self.ids.next_unique(|candidate| orders.contains(candidate));
        let order = Order::snapshot(id, product, customer, &chrono::Local::now());
        log_store_failure("orders", self.orders.add(order.clone()))?;
        Ok(order)
    }
}

/// A plausible made-up customer.
pub fn simulated_customer<R: Rng + ?Sized>(rng: &mut R) -> Customer {
    let name = SIMULATED_NAMES.choose(rng).copied().unwrap_or("Alice Martin");
    let address = SIMULATED_ADDRESSES
        .choose(rng)
        .copied()
        .unwrap_or("12 Peace Street, 75002 Paris");
    Customer {
        name: name.to_owned(),
        email: format!("client{}@example.com", rng.random_range(0..1000)),
        address: address.to_owned(),
    }
}
