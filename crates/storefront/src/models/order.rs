//! Captured order.
//!
//! An order copies the product title and price at the moment it is placed.
//! Later edits to the product, or its deletion, do not touch existing orders.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use customshop_core::price::deserialize_lenient;
use customshop_core::{OrderId, Price, ProductId};

use super::Product;

/// Display format for order dates (`16/10/2026 14:03:12`).
pub const ORDER_DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Who placed an order and where it ships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Full name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Shipping address.
    pub address: String,
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Product that was ordered. May no longer exist in the catalog.
    pub product_id: ProductId,
    /// Product title when the order was placed.
    #[serde(default)]
    pub product_title: String,
    /// Product price when the order was placed.
    ///
    /// Non-numeric values written by older versions decode as zero.
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub price: Price,
    /// Customer full name.
    #[serde(default)]
    pub customer_name: String,
    /// Customer email.
    #[serde(default)]
    pub customer_email: String,
    /// Shipping address.
    #[serde(default)]
    pub customer_address: String,
    /// Creation date, formatted with [`ORDER_DATE_FORMAT`].
    #[serde(default)]
    pub date: String,
}

impl Order {
    /// Build an order for `product`, snapshotting its title and price.
    #[must_use]
    pub fn snapshot<Tz: TimeZone>(
        id: OrderId,
        product: &Product,
        customer: Customer,
        placed_at: &DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            id,
            product_id: product.id.clone(),
            product_title: product.title.clone(),
            price: product.price,
            customer_name: customer.name,
            customer_email: customer.email,
            customer_address: customer.address,
            date: placed_at.format(ORDER_DATE_FORMAT).to_string(),
        }
    }
}
