//! Components shared by the storefront and admin screens

mod live;
mod raw_img;
mod thumbnail;
pub mod theme;

pub use live::watch_catalog;
pub use theme::{ThemeColors, colors};
pub use thumbnail::{DecodedImage, ThumbSource, decode_thumbnail, thumbnail_view};
