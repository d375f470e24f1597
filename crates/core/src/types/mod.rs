//! Core types for CustomShop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod email;
pub mod id;
pub mod price;
pub mod theme;

pub use credential::PlainPassword;
pub use email::{Email, EmailError, normalize_email};
pub use id::*;
pub use price::{Price, PriceError};
pub use theme::{ButtonRadius, FontFamily, ThemeError};
