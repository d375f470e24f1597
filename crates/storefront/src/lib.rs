//! CustomShop storefront library.
//!
//! Client-side state for a single-tenant shop: catalog, orders, site
//! settings, accounts and the logged-in session, all persisted through a
//! pluggable key-value store. Front-ends drive an [`state::AppState`] and
//! render whatever [`routes::resolve_route`] picks.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod assistant;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod surface;

pub use config::ShopConfig;
pub use error::AppError;
pub use state::AppState;
