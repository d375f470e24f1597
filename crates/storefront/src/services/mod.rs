//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Account registration, login and the admin check
//! - `forms` - Admin product form and checkout form validation
//! - `orders` - Checkout and simulated sales

pub mod auth;
pub mod forms;
pub mod orders;
