//! Application and screen state

mod admin;
mod app;
mod storefront;

pub use admin::{AdminState, StatusMessage};
pub use app::AppState;
pub use storefront::StorefrontState;
