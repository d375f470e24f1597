//! CustomShop Core - Shared types library.
//!
//! This crate provides common types used across all CustomShop components:
//! - `storefront` - Local state, persistence, and session handling
//! - `cli` - Terminal front-end for the storefront
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, passwords and theme choices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
