//! Domain models for the storefront.
//!
//! These are the records persisted by the repositories in [`crate::db`].
//! Field names serialize in camelCase so stores written by earlier versions
//! of the storefront keep loading.

pub mod order;
pub mod product;
pub mod session;
pub mod settings;
pub mod user;

pub use order::{Customer, Order};
pub use product::Product;
pub use session::{User, ViewMode};
pub use settings::{SettingsPatch, SiteSettings, SocialLinks, SocialLinksPatch, SocialPlatform};
pub use user::RegisteredUser;
