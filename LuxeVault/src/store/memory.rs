//! In-process collection backend
//!
//! Behaves like the remote store (chronological keys, full-snapshot
//! delivery on every change) without any network.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use super::{AssetStore, Snapshot, SnapshotSink, Subscription};
use crate::error::Result;
use crate::record::{AssetRecord, NewAssetRecord};

struct Subscriber {
    id: u64,
    active: Arc<AtomicBool>,
    sink: SnapshotSink,
}

#[derive(Default)]
struct Inner {
    records: BTreeMap<String, AssetRecord>,
    next_key: u64,
    next_subscriber: u64,
    subscribers: Vec<Subscriber>,
}

impl Inner {
    fn snapshot(&self) -> Snapshot {
        self.records.values().cloned().collect()
    }

    fn live_sinks(&self) -> Vec<SnapshotSink> {
        self.subscribers
            .iter()
            .filter(|s| s.active.load(Ordering::SeqCst))
            .map(|s| s.sink.clone())
            .collect()
    }
}

/// Thread-safe in-memory store
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with records (their ids are kept as keys)
    pub fn with_records(records: impl IntoIterator<Item = AssetRecord>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for record in records {
                inner.records.insert(record.id.clone(), record);
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of subscriptions that have not been released
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking sink cannot corrupt the map, so keep serving after poison
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Deliver the current collection to every live subscriber, outside the lock
    fn broadcast(&self) {
        let (snapshot, sinks) = {
            let inner = self.lock();
            (inner.snapshot(), inner.live_sinks())
        };
        for sink in sinks {
            sink(snapshot.clone());
        }
    }
}

impl AssetStore for MemoryStore {
    fn fetch(&self) -> Result<Vec<AssetRecord>> {
        Ok(self.lock().snapshot())
    }

    fn push(&self, record: NewAssetRecord) -> Result<String> {
        let key = {
            let mut inner = self.lock();
            inner.next_key += 1;
            let key = format!("-LV{:012}", inner.next_key);
            let created_at = chrono::Utc::now().timestamp_millis();
            inner
                .records
                .insert(key.clone(), record.into_record(key.clone(), created_at));
            key
        };
        tracing::debug!("Memory store pushed {}", key);
        self.broadcast();
        Ok(key)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let removed = self.lock().records.remove(key);
        if removed.is_none() {
            tracing::debug!("Memory store has no {}, nothing to remove", key);
            return Ok(());
        }
        self.broadcast();
        Ok(())
    }

    fn subscribe(&self, sink: SnapshotSink) -> Subscription {
        let active = Arc::new(AtomicBool::new(true));
        let (id, snapshot) = {
            let mut inner = self.lock();
            inner.next_subscriber += 1;
            let id = inner.next_subscriber;
            inner.subscribers.push(Subscriber {
                id,
                active: active.clone(),
                sink: sink.clone(),
            });
            (id, inner.snapshot())
        };
        sink(snapshot);

        let weak: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        Subscription::new(active).on_release(move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                inner.subscribers.retain(|s| s.id != id);
            }
        })
    }
}
