#![allow(non_snake_case)]
//! # LuxeVault
//!
//! The catalog engine behind the Luxe Archive 3D showroom.
//!
//! ## Modules
//!
//! - **record** - Asset records as stored in the live collection
//! - **store** - Live collection backends (in-memory, Firebase Realtime Database)
//! - **media** - Media host uploads (Cloudinary unsigned presets)
//! - **session** - Client storage and the admin session gate
//! - **admin** - Upload form validation and the two-stage upload flow
//! - **catalog** - Storefront read-through cache and card presentation
//! - **normalize** - Centering and scaling of mesh hierarchies
//! - **gltf_import** - Builds a normalizable scene tree from GLB/glTF files
//!
//! ## Quick Start
//!
//! ```no_run
//! use luxevault::prelude::*;
//!
//! let config = VaultConfig::load();
//! let store = FirebaseStore::new(&config);
//! let records = store.fetch()?;
//! println!("{} assets in the vault", records.len());
//! # Ok::<(), luxevault::Error>(())
//! ```
//!
//! ### Normalizing a Model
//!
//! ```no_run
//! use luxevault::gltf_import::load_scene;
//! use luxevault::normalize::{normalize, NormalizeSettings};
//!
//! let mut scene = load_scene("chronos.glb")?;
//! let report = normalize(&mut scene, &NormalizeSettings::default());
//! println!("scale {:.3}", report.scale);
//! # Ok::<(), luxevault::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `luxevault` command-line binary

pub mod admin;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gltf_import;
pub mod media;
pub mod normalize;
pub mod record;
pub mod session;
pub mod store;

pub use error::{Error, Result};

// Math types used by the normalization API
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result, ValidationError};
    pub use crate::config::VaultConfig;
    pub use crate::record::{AssetRecord, NewAssetRecord, Thumbnail};

    pub use crate::store::{AssetStore, Snapshot, Subscription};
    pub use crate::store::firebase::FirebaseStore;
    pub use crate::store::memory::MemoryStore;

    pub use crate::media::{MediaHost, ResourceKind, UploadFile, UploadedMedia};
    pub use crate::media::cloudinary::CloudinaryHost;

    pub use crate::session::{
        ClientStorage, Credentials, FileStorage, MemoryStorage, Route, SessionContext,
        SessionState,
    };
    pub use crate::admin::{AdminController, SubmitOutcome, UploadForm};
    pub use crate::catalog::{CardView, Catalog};

    pub use crate::normalize::{
        Bounds, MaterialParams, MeshHierarchy, NormalizeFit, NormalizeReport, NormalizeSettings,
        SceneNode, normalize,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
