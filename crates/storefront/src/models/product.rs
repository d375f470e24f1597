//! Catalog product.

use serde::{Deserialize, Serialize};

use customshop_core::{Price, ProductId};

/// A product offered in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Sales copy shown on the product card.
    #[serde(default)]
    pub description: String,
    /// Product image.
    #[serde(default)]
    pub image_url: String,
    /// Free-form category label.
    #[serde(default)]
    pub category: String,
}

impl Product {
    /// The placeholder product shown in a fresh catalog.
    #[must_use]
    pub fn example() -> Self {
        Self {
            id: ProductId::new("1"),
            title: "Example Product".to_owned(),
            price: Price::new(rust_decimal::Decimal::new(9900, 2)),
            description: "Edit this listing from your admin panel.".to_owned(),
            image_url: "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=800"
                .to_owned(),
            category: "General".to_owned(),
        }
    }
}
