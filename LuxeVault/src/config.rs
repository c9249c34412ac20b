//! Vault configuration
//!
//! Loaded from `{config_dir}/LuxeArchive/config.json` when present, with
//! environment variables taking precedence over the file.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Directory name used under the platform config/data directories
pub const APP_DIR_NAME: &str = "LuxeArchive";

// Default value functions for serde
fn default_database_url() -> String {
    "https://d-portfolio-27-default-rtdb.firebaseio.com".to_string()
}
fn default_collection_path() -> String {
    "models".to_string()
}
fn default_cloud_name() -> String {
    "dj8ge55xe".to_string()
}
fn default_upload_preset() -> String {
    "3d_portfolio".to_string()
}
fn default_admin_identifier() -> String {
    "vault@archive.luxe".to_string()
}
fn default_admin_passcode() -> String {
    "James Bond 27".to_string()
}
fn default_target_size() -> f32 {
    2.8
}

/// Connection and gate settings shared by the GUI, viewer, and CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Root URL of the realtime database (no trailing slash needed)
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Path of the asset collection inside the database
    #[serde(default = "default_collection_path")]
    pub collection_path: String,
    /// Media host account name
    #[serde(default = "default_cloud_name")]
    pub cloud_name: String,
    /// Unsigned upload preset
    #[serde(default = "default_upload_preset")]
    pub upload_preset: String,
    /// Admin gate identifier. A UI convenience, not authentication.
    #[serde(default = "default_admin_identifier")]
    pub admin_identifier: String,
    /// Admin gate passcode. A UI convenience, not authentication.
    #[serde(default = "default_admin_passcode")]
    pub admin_passcode: String,
    /// Length the largest model extent is scaled to
    #[serde(default = "default_target_size")]
    pub target_size: f32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            collection_path: default_collection_path(),
            cloud_name: default_cloud_name(),
            upload_preset: default_upload_preset(),
            admin_identifier: default_admin_identifier(),
            admin_passcode: default_admin_passcode(),
            target_size: default_target_size(),
        }
    }
}

impl VaultConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR_NAME).join("config.json"))
    }

    /// Load config from disk (or defaults), then apply environment overrides
    pub fn load() -> Self {
        let content = Self::config_path().and_then(|path| fs::read_to_string(path).ok());
        let mut config = content.as_deref().map(Self::from_json).unwrap_or_default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Parse a config file body; malformed content falls back to defaults
    pub fn from_json(content: &str) -> Self {
        match serde_json::from_str::<Self>(content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring malformed config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or(Error::NoConfigDir)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Apply overrides from a variable lookup (the process environment in practice)
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let overrides: [(&str, &mut String); 5] = [
            ("LUXE_DATABASE_URL", &mut self.database_url),
            ("LUXE_CLOUD_NAME", &mut self.cloud_name),
            ("LUXE_UPLOAD_PRESET", &mut self.upload_preset),
            ("LUXE_ADMIN_ID", &mut self.admin_identifier),
            ("LUXE_ADMIN_PASSCODE", &mut self.admin_passcode),
        ];
        for (key, field) in overrides {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }
    }

    /// Database URL without a trailing slash
    pub fn database_root(&self) -> &str {
        self.database_url.trim_end_matches('/')
    }
}
