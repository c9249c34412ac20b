//! Live collection of asset records
//!
//! A store is a flat keyed collection under one path. Every change is
//! delivered to subscribers as a full snapshot; there is no diffing
//! contract. Subscribers own a [`Subscription`] handle and stop receiving
//! snapshots once it is cancelled or dropped.

pub mod firebase;
pub mod memory;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;

use crate::error::Result;
use crate::record::{AssetRecord, NewAssetRecord};

/// The full collection at one point in time, in key order
pub type Snapshot = Vec<AssetRecord>;

/// Receiver of snapshots, called from whichever thread the backend delivers on
pub type SnapshotSink = Arc<dyn Fn(Snapshot) + Send + Sync>;

/// Backend-agnostic access to the live collection
pub trait AssetStore: Send + Sync {
    /// Read the whole collection once
    fn fetch(&self) -> Result<Vec<AssetRecord>>;

    /// Append a record under a new store-assigned key, returning the key
    fn push(&self, record: NewAssetRecord) -> Result<String>;

    /// Remove exactly one record by key.
    ///
    /// Removing a key that is not present succeeds and changes nothing, the
    /// same as a REST `DELETE` of a missing path.
    fn remove(&self, key: &str) -> Result<()>;

    /// Start delivering snapshots to `sink`.
    ///
    /// The current collection is delivered first. Subscription errors are
    /// logged and delivered as an empty snapshot.
    fn subscribe(&self, sink: SnapshotSink) -> Subscription;
}

/// Cancellation handle for a live subscription.
///
/// Dropping the handle cancels it.
pub struct Subscription {
    active: Arc<AtomicBool>,
    on_release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap the flag a backend checks before each delivery
    pub fn new(active: Arc<AtomicBool>) -> Self {
        Self {
            active,
            on_release: None,
        }
    }

    /// Run `release` once when the subscription ends
    pub fn on_release(mut self, release: impl FnOnce() + Send + 'static) -> Self {
        self.on_release = Some(Box::new(release));
        self
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Stop delivery and release backend resources
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        if let Some(release) = self.on_release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

/// Decode a collection body (`null` or `{key: record}`) into key-ordered records.
///
/// Entries that do not decode are skipped with a warning so one bad write
/// cannot blank the storefront.
pub fn decode_collection(value: Value) -> Vec<AssetRecord> {
    let Value::Object(entries) = value else {
        return Vec::new();
    };

    let mut records: Vec<AssetRecord> = entries
        .into_iter()
        .filter_map(|(key, body)| match serde_json::from_value::<AssetRecord>(body) {
            Ok(record) => Some(record.with_id(key)),
            Err(e) => {
                tracing::warn!("Skipping malformed record {}: {}", key, e);
                None
            }
        })
        .collect();

    // Store keys are chronological, so key order is insertion order
    records.sort_by(|a, b| a.id.cmp(&b.id));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_null_collection() {
        assert!(decode_collection(Value::Null).is_empty());
    }

    #[test]
    fn test_decode_sorts_by_key_and_skips_malformed() {
        let value = json!({
            "-b": {"name": "Second", "modelUrl": "m2", "public_id": "p2", "createdAt": 2},
            "-a": {"name": "First", "modelUrl": "m1", "public_id": "p1", "createdAt": 1},
            "-c": {"unexpected": true}
        });
        let records = decode_collection(value);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["First", "Second"]);
        assert_eq!(records[0].id, "-a");
    }

    #[test]
    fn test_subscription_release_runs_once() {
        use std::sync::atomic::AtomicUsize;

        let released = Arc::new(AtomicUsize::new(0));
        let counter = released.clone();
        let active = Arc::new(AtomicBool::new(true));
        let sub = Subscription::new(active.clone()).on_release(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(sub.is_active());
        sub.cancel();
        assert!(!active.load(Ordering::SeqCst));
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
