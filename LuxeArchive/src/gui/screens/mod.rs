//! Top-level screens

pub mod admin;
pub mod storefront;

pub use admin::admin_screen;
pub use storefront::storefront_screen;
