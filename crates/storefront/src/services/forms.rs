//! Input forms: admin product entry and customer checkout.
//!
//! Repositories accept whatever they are given; these forms are where user
//! input gets trimmed, defaulted and rejected.

use thiserror::Error;

use customshop_core::{Email, EmailError, Price, ProductId};

use crate::models::{Customer, Product};

/// Category used when the product form leaves it blank.
pub const DEFAULT_CATEGORY: &str = "General";

/// Errors produced by form validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// The product title is blank.
    #[error("title is required")]
    EmptyTitle,

    /// The product price is below zero.
    #[error("price cannot be negative")]
    NegativePrice,

    /// A required checkout field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The checkout email does not parse.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

impl FormError {
    /// Message suitable for showing to the person at the keyboard.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyTitle => "Please enter a product title.".to_owned(),
            Self::NegativePrice => "The price cannot be negative.".to_owned(),
            Self::MissingField(field) => format!("Please fill in your {field}."),
            Self::InvalidEmail(_) => "Please enter a valid email address.".to_owned(),
        }
    }
}

/// Raw admin product form.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub title: String,
    /// Price as typed; `,` is accepted as the decimal separator.
    pub price: String,
    pub category: String,
    pub image_url: String,
}

/// A validated product form, waiting for an id and a description.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub title: String,
    pub price: Price,
    pub category: String,
    pub image_url: String,
}

impl ProductForm {
    /// Validate and normalize the form.
    ///
    /// A price that is not a number counts as zero. A blank category becomes
    /// [`DEFAULT_CATEGORY`] and a blank image URL becomes a placeholder
    /// picture seeded by the title.
    ///
    /// # Errors
    ///
    /// Returns `FormError::EmptyTitle` for a blank title and
    /// `FormError::NegativePrice` for a price below zero.
    pub fn validate(&self) -> Result<ProductDraft, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::EmptyTitle);
        }

        let price = Price::non_negative(Price::parse_lenient(&self.price).amount())
            .map_err(|_| FormError::NegativePrice)?;

        let category = match self.category.trim() {
            "" => DEFAULT_CATEGORY.to_owned(),
            category => category.to_owned(),
        };

        let image_url = match self.image_url.trim() {
            "" => placeholder_image(title),
            url => url.to_owned(),
        };

        Ok(ProductDraft {
            title: title.to_owned(),
            price,
            category,
            image_url,
        })
    }
}

impl ProductDraft {
    /// Turn the draft into a catalog product.
    #[must_use]
    pub fn into_product(self, id: ProductId, description: String) -> Product {
        Product {
            id,
            title: self.title,
            price: self.price,
            description,
            image_url: self.image_url,
            category: self.category,
        }
    }
}

/// Placeholder picture URL for a product without an image.
#[must_use]
pub fn placeholder_image(title: &str) -> String {
    format!(
        "https://picsum.photos/seed/{}/400/300",
        urlencoding::encode(title)
    )
}

/// Raw checkout form.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub address: String,
}

impl CheckoutForm {
    /// Validate the form into the customer details of an order.
    ///
    /// # Errors
    ///
    /// Returns `FormError::MissingField` for a blank field and
    /// `FormError::InvalidEmail` for an email that does not parse.
    pub fn validate(&self) -> Result<Customer, FormError> {
        let name = required("name", &self.name)?;
        let email = required("email", &self.email)?;
        let address = required("address", &self.address)?;
        let email = Email::parse(email)?;

        Ok(Customer {
            name: name.to_owned(),
            email: email.into_inner(),
            address: address.to_owned(),
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, FormError> {
    match value.trim() {
        "" => Err(FormError::MissingField(field)),
        trimmed => Ok(trimmed),
    }
}
