//! Live catalog feed for the screens
//!
//! The store delivers snapshots on its own thread into a one-slot inbox;
//! the UI thread polls the inbox with `exec_after` and applies the latest
//! snapshot. Only the newest snapshot matters, so an undrained one is
//! simply replaced.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use floem::action::exec_after;
use floem::prelude::*;
use luxevault::catalog::Catalog;
use luxevault::store::{AssetStore, Snapshot, Subscription};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

type Inbox = Arc<Mutex<Option<Snapshot>>>;

/// Subscribe to `store` and mirror it into a catalog signal.
///
/// The subscription lives until `active` returns false, then it is dropped
/// and delivery stops.
pub fn watch_catalog(
    store: &Arc<dyn AssetStore>,
    active: impl Fn() -> bool + 'static,
) -> RwSignal<Catalog> {
    let catalog = RwSignal::new(Catalog::new());
    let inbox: Inbox = Arc::default();

    let sink_inbox = inbox.clone();
    let subscription = store.subscribe(Arc::new(move |snapshot: Snapshot| {
        if let Ok(mut slot) = sink_inbox.lock() {
            *slot = Some(snapshot);
        }
    }));

    poll_inbox(subscription, inbox, catalog, active);
    catalog
}

fn poll_inbox(
    subscription: Subscription,
    inbox: Inbox,
    catalog: RwSignal<Catalog>,
    active: impl Fn() -> bool + 'static,
) {
    if !active() {
        tracing::debug!("Screen closed, releasing catalog subscription");
        subscription.cancel();
        return;
    }

    if let Some(snapshot) = inbox.lock().ok().and_then(|mut slot| slot.take()) {
        tracing::debug!("Applying snapshot of {} records", snapshot.len());
        catalog.update(|c| c.apply_snapshot(snapshot));
    }

    exec_after(POLL_INTERVAL, move |_| {
        poll_inbox(subscription, inbox, catalog, active);
    });
}
