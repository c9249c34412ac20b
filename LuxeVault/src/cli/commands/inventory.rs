//! CLI commands for reading and pruning the collection

use chrono::{DateTime, Utc};

use super::session::require_admin;
use crate::catalog::{Catalog, EMPTY_INVENTORY};
use crate::cli::progress::spinner;
use crate::config::VaultConfig;
use crate::store::AssetStore;
use crate::store::firebase::FirebaseStore;

/// Render a server timestamp (milliseconds since epoch)
fn format_created(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn list(count: bool) -> anyhow::Result<()> {
    let config = VaultConfig::load();
    let store = FirebaseStore::new(&config);

    let pb = spinner("Fetching collection...");
    let snapshot = store.fetch();
    pb.finish_and_clear();

    let mut catalog = Catalog::new();
    catalog.apply_snapshot(snapshot?);

    if count {
        println!("{}", catalog.len());
        return Ok(());
    }

    if catalog.is_empty() {
        println!("{EMPTY_INVENTORY}");
        return Ok(());
    }

    println!("{:<22}  {:<12}  {:<16}  NAME", "KEY", "REF", "CREATED");
    for (row, record) in catalog.inventory().iter().zip(catalog.records()) {
        println!(
            "{:<22}  {:<12}  {:<16}  {}",
            row.key,
            row.short_id,
            format_created(record.created_at),
            row.name
        );
    }
    println!();
    println!("{}", catalog.count_label());
    Ok(())
}

pub fn purge(key: &str) -> anyhow::Result<()> {
    let config = VaultConfig::load();
    require_admin(&config)?;

    let store = FirebaseStore::new(&config);
    store.remove(key)?;
    println!("Purged {key}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_created() {
        assert_eq!(format_created(0), "1970-01-01 00:00");
        assert_eq!(format_created(1_700_000_000_000), "2023-11-14 22:13");
    }
}
