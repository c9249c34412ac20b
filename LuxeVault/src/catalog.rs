//! Storefront catalog state
//!
//! A read-through cache of the live collection. Every snapshot replaces the
//! cache wholesale; selection and thumbnail failures are pruned to keys that
//! still exist.

use std::collections::HashSet;

use crate::record::{AssetRecord, Thumbnail};
use crate::store::Snapshot;

/// Shown while the collection is empty (or still loading)
pub const EMPTY_STOREFRONT: &str = "Synchronizing Vault Data...";

/// Shown in the admin inventory when the collection is empty
pub const EMPTY_INVENTORY: &str = "Vault Empty";

/// Characters of the public id shown on storefront cards
pub const CARD_REF_LEN: usize = 8;

/// Characters of the public id shown in the admin inventory
pub const INVENTORY_REF_LEN: usize = 12;

/// One storefront grid card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub key: String,
    pub name: String,
    pub thumbnail: Thumbnail,
    /// `Ref: ` suffix, the tail of the public id
    pub reference: String,
}

/// One admin inventory row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRow {
    pub key: String,
    pub name: String,
    pub thumbnail: Thumbnail,
    pub short_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<AssetRecord>,
    selected: Option<String>,
    failed_thumbnails: HashSet<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache with a fresh snapshot
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.records = snapshot;

        let keys: HashSet<&str> = self.records.iter().map(|r| r.id.as_str()).collect();
        self.failed_thumbnails.retain(|k| keys.contains(k.as_str()));
        if self
            .selected
            .as_deref()
            .is_some_and(|selected| !keys.contains(selected))
        {
            self.selected = None;
        }
    }

    pub fn records(&self) -> &[AssetRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&AssetRecord> {
        self.records.iter().find(|r| r.id == key)
    }

    /// Open the detail view for one asset
    pub fn open(&mut self, key: &str) -> Option<&AssetRecord> {
        let found = self.records.iter().any(|r| r.id == key);
        if found {
            self.selected = Some(key.to_string());
        }
        self.selected()
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&AssetRecord> {
        self.selected.as_deref().and_then(|key| self.get(key))
    }

    /// A thumbnail that failed to load falls back to the placeholder
    pub fn mark_thumbnail_failed(&mut self, key: &str) {
        self.failed_thumbnails.insert(key.to_string());
    }

    fn thumbnail_for(&self, record: &AssetRecord) -> Thumbnail {
        if self.failed_thumbnails.contains(&record.id) {
            Thumbnail::Placeholder
        } else {
            record.thumbnail()
        }
    }

    pub fn cards(&self) -> Vec<CardView> {
        self.records
            .iter()
            .map(|record| CardView {
                key: record.id.clone(),
                name: record.name.clone(),
                thumbnail: self.thumbnail_for(record),
                reference: record.short_ref(CARD_REF_LEN).to_string(),
            })
            .collect()
    }

    pub fn inventory(&self) -> Vec<InventoryRow> {
        self.records
            .iter()
            .map(|record| InventoryRow {
                key: record.id.clone(),
                name: record.name.clone(),
                thumbnail: self.thumbnail_for(record),
                short_id: record.short_ref(INVENTORY_REF_LEN).to_string(),
            })
            .collect()
    }

    /// Admin header count, e.g. `3 Items`
    pub fn count_label(&self) -> String {
        format!("{} Items", self.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(id: &str, thumb: Option<&str>) -> AssetRecord {
        AssetRecord {
            id: id.to_string(),
            name: format!("Asset {id}"),
            model_url: format!("https://cdn/{id}.glb"),
            thumbnail_url: thumb.map(str::to_string),
            public_id: format!("portfolio/{id}-0123456789"),
            delete_token: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_snapshot_replaces_cache() {
        let mut catalog = Catalog::new();
        catalog.apply_snapshot(vec![record("a", None), record("b", None)]);
        catalog.apply_snapshot(vec![record("c", None)]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records()[0].id, "c");
    }

    #[test]
    fn test_selection_dropped_when_record_disappears() {
        let mut catalog = Catalog::new();
        catalog.apply_snapshot(vec![record("a", None), record("b", None)]);
        assert_eq!(catalog.open("b").map(|r| r.id.as_str()), Some("b"));

        catalog.apply_snapshot(vec![record("a", None)]);
        assert!(catalog.selected().is_none());
    }

    #[test]
    fn test_open_unknown_keeps_current_selection() {
        let mut catalog = Catalog::new();
        catalog.apply_snapshot(vec![record("a", None)]);
        catalog.open("a");
        assert_eq!(catalog.open("zzz").map(|r| r.id.as_str()), Some("a"));
    }

    #[test]
    fn test_cards_degrade_to_placeholder() {
        let mut catalog = Catalog::new();
        catalog.apply_snapshot(vec![
            record("a", Some("https://img/a.png")),
            record("b", None),
            record("c", Some("https://img/c.png")),
        ]);
        catalog.mark_thumbnail_failed("c");

        let thumbs: Vec<Thumbnail> = catalog.cards().into_iter().map(|c| c.thumbnail).collect();
        assert_eq!(
            thumbs,
            vec![
                Thumbnail::Image("https://img/a.png".to_string()),
                Thumbnail::Placeholder,
                Thumbnail::Placeholder,
            ]
        );
    }

    #[test]
    fn test_reference_lengths() {
        let mut catalog = Catalog::new();
        catalog.apply_snapshot(vec![record("a", None)]);
        assert_eq!(catalog.cards()[0].reference, "23456789");
        assert_eq!(catalog.inventory()[0].short_id, "a-0123456789");
        assert_eq!(catalog.count_label(), "1 Items");
    }
}
