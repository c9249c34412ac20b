//! CLI commands for the admin session

use std::sync::Arc;

use crate::config::VaultConfig;
use crate::session::{Credentials, FileStorage, Route, SessionContext, SessionState};

/// Session backed by the same storage file the GUI uses
pub fn open_session(config: &VaultConfig) -> anyhow::Result<SessionContext> {
    let storage = FileStorage::default_location()?;
    Ok(SessionContext::new(
        Arc::new(storage),
        Credentials::from_config(config),
    ))
}

/// Fail unless an admin session is active
pub fn require_admin(config: &VaultConfig) -> anyhow::Result<SessionContext> {
    let session = open_session(config)?;
    if session.resolve(Route::Admin) != Route::Admin {
        anyhow::bail!("Admin session required. Run `luxevault login` first.");
    }
    Ok(session)
}

pub fn login(identifier: &str, passcode: &str) -> anyhow::Result<()> {
    let config = VaultConfig::load();
    let session = open_session(&config)?;
    session.login(identifier, passcode)?;
    println!("Admin session opened");
    Ok(())
}

pub fn logout() -> anyhow::Result<()> {
    let config = VaultConfig::load();
    open_session(&config)?.logout()?;
    println!("Admin session closed");
    Ok(())
}

pub fn status(save_config: bool) -> anyhow::Result<()> {
    let config = VaultConfig::load();
    let session = open_session(&config)?;

    let state = match session.state() {
        SessionState::Authorized => "authorized",
        SessionState::Anonymous => "anonymous",
    };
    println!("Session:     {state}");
    println!("Database:    {}/{}", config.database_root(), config.collection_path);
    println!("Media host:  {} (preset {})", config.cloud_name, config.upload_preset);
    println!("Target size: {}", config.target_size);
    if let Some(path) = VaultConfig::config_path() {
        println!("Config file: {}", path.display());
    }

    if save_config {
        config.save()?;
        println!("Configuration saved");
    }
    Ok(())
}
