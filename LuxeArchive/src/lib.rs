#![allow(non_snake_case)]
//! Luxe Archive - 3D asset showroom
//!
//! The storefront/admin GUI (floem) and the standalone glTF viewer (bevy)
//! built on the `luxevault` engine. The GUI opens the viewer as a separate
//! process for each asset's detail view.

// Re-export the engine
pub use luxevault;

pub use luxevault::{Error, Result};

// Feature-gated modules
#[cfg(feature = "gui")]
pub mod gui;

#[cfg(feature = "viewer")]
pub mod viewer;

/// Name of the viewer executable the GUI launches
pub const VIEWER_BINARY: &str = "luxe-viewer";
