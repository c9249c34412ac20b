//! Firebase Realtime Database backend (REST surface)
//!
//! - `GET  {db}/{path}.json` - full snapshot
//! - `POST {db}/{path}.json` - push, answers `{"name": "<key>"}`
//! - `DELETE {db}/{path}/{key}.json` - remove
//! - `GET` with `Accept: text/event-stream` - change notifications
//!
//! Every `put`/`patch` notification triggers a fresh full fetch, so
//! subscribers always see whole snapshots.

use std::io::{BufRead, BufReader};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde_json::{Value, json};

use super::{AssetStore, SnapshotSink, Subscription, decode_collection};
use crate::config::VaultConfig;
use crate::error::{Error, Result};
use crate::record::{AssetRecord, NewAssetRecord};

/// Connect timeout for every request
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Read timeout for one-shot requests (streams have none)
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Realtime Database store rooted at one collection path
#[derive(Clone)]
pub struct FirebaseStore {
    root: String,
    path: String,
    agent: ureq::Agent,
    stream_agent: ureq::Agent,
}

impl FirebaseStore {
    pub fn new(config: &VaultConfig) -> Self {
        Self::with_root(config.database_root(), &config.collection_path)
    }

    pub fn with_root(root: &str, path: &str) -> Self {
        Self {
            root: root.trim_end_matches('/').to_string(),
            path: path.trim_matches('/').to_string(),
            agent: ureq::AgentBuilder::new()
                .timeout_connect(CONNECT_TIMEOUT)
                .timeout_read(READ_TIMEOUT)
                .build(),
            stream_agent: ureq::AgentBuilder::new()
                .timeout_connect(CONNECT_TIMEOUT)
                .build(),
        }
    }

    /// URL of the whole collection
    pub fn collection_url(&self) -> String {
        format!("{}/{}.json", self.root, self.path)
    }

    /// URL of one entry
    pub fn entry_url(&self, key: &str) -> String {
        format!("{}/{}/{}.json", self.root, self.path, urlencoding::encode(key))
    }
}

/// Wire body for a push; `createdAt` is the server timestamp placeholder
fn push_body(record: &NewAssetRecord) -> Value {
    json!({
        "name": record.name,
        "modelUrl": record.model_url,
        "thumbnailUrl": record.thumbnail_url,
        "public_id": record.public_id,
        "deleteToken": record.delete_token,
        "createdAt": {".sv": "timestamp"},
    })
}

impl AssetStore for FirebaseStore {
    fn fetch(&self) -> Result<Vec<AssetRecord>> {
        let value: Value = self.agent.get(&self.collection_url()).call()?.into_json()?;
        Ok(decode_collection(value))
    }

    fn push(&self, record: NewAssetRecord) -> Result<String> {
        let response: Value = self
            .agent
            .post(&self.collection_url())
            .send_json(push_body(&record))?
            .into_json()?;

        let key = response["name"].as_str().ok_or(Error::MissingKey)?.to_string();
        tracing::info!("Stored asset '{}' under {}", record.name, key);
        Ok(key)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.agent.delete(&self.entry_url(key)).call()?;
        tracing::info!("Removed asset {}", key);
        Ok(())
    }

    fn subscribe(&self, sink: SnapshotSink) -> Subscription {
        let active = Arc::new(AtomicBool::new(true));
        let store = self.clone();
        let flag = active.clone();

        std::thread::spawn(move || {
            if let Err(e) = store.stream_changes(&flag, &sink) {
                if flag.load(Ordering::SeqCst) {
                    tracing::error!("Firebase subscription error: {}", e);
                    sink(Vec::new());
                }
            }
        });

        Subscription::new(active)
    }
}

/// One server-sent event
#[derive(Debug, Default, PartialEq, Eq)]
struct StreamEvent {
    event: String,
    data: String,
}

/// What a stream event means for subscribers
#[derive(Debug, PartialEq, Eq)]
enum StreamAction {
    Refresh,
    Ignore,
    Close(String),
}

fn classify(event: &StreamEvent) -> StreamAction {
    match event.event.as_str() {
        "put" | "patch" => StreamAction::Refresh,
        "keep-alive" => StreamAction::Ignore,
        "cancel" => StreamAction::Close("permission denied by security rules".to_string()),
        "auth_revoked" => StreamAction::Close("credential expired".to_string()),
        other => StreamAction::Close(format!("unexpected stream event `{other}`")),
    }
}

impl FirebaseStore {
    /// Open the event stream and follow it until cancelled or closed
    fn stream_changes(&self, active: &AtomicBool, sink: &SnapshotSink) -> Result<()> {
        let response = self
            .stream_agent
            .get(&self.collection_url())
            .set("Accept", "text/event-stream")
            .call()?;
        let reader = BufReader::new(response.into_reader());
        follow_stream(reader.lines(), active, sink, || self.fetch())
    }
}

/// Turn stream lines into snapshot deliveries.
///
/// A failed refresh delivers an empty snapshot and the stream keeps going,
/// so the next notification can recover. Only stream-level failures and
/// `cancel`/`auth_revoked` end it.
fn follow_stream(
    lines: impl Iterator<Item = std::io::Result<String>>,
    active: &AtomicBool,
    sink: &SnapshotSink,
    refresh: impl Fn() -> Result<Vec<AssetRecord>>,
) -> Result<()> {
    let mut pending = StreamEvent::default();
    for line in lines {
        // The server sends keep-alives, so a cancelled flag is noticed within one interval
        if !active.load(Ordering::SeqCst) {
            tracing::debug!("Subscription released");
            return Ok(());
        }

        let line = line?;
        if let Some(name) = line.strip_prefix("event:") {
            pending.event = name.trim().to_string();
        } else if let Some(data) = line.strip_prefix("data:") {
            pending.data = data.trim().to_string();
        } else if line.is_empty() && !pending.event.is_empty() {
            let event = std::mem::take(&mut pending);
            match classify(&event) {
                StreamAction::Refresh => {
                    tracing::debug!("Change notification: {}", event.data);
                    let snapshot = refresh().unwrap_or_else(|e| {
                        tracing::warn!("Archive refresh failed, showing an empty vault: {}", e);
                        Vec::new()
                    });
                    if !active.load(Ordering::SeqCst) {
                        return Ok(());
                    }
                    tracing::debug!("Archive data received: {} items", snapshot.len());
                    sink(snapshot);
                }
                StreamAction::Ignore => {}
                StreamAction::Close(reason) => return Err(Error::Subscription(reason)),
            }
        }
    }

    Err(Error::Subscription("stream closed by server".to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn test_urls() {
        let store = FirebaseStore::with_root("https://db.example.com/", "/models/");
        assert_eq!(store.collection_url(), "https://db.example.com/models.json");
        assert_eq!(store.entry_url("-Nx1"), "https://db.example.com/models/-Nx1.json");
    }

    #[test]
    fn test_push_body_uses_server_timestamp() {
        let body = push_body(&NewAssetRecord {
            name: "Orb".to_string(),
            model_url: "https://cdn/orb.glb".to_string(),
            thumbnail_url: None,
            public_id: "orb".to_string(),
            delete_token: Some("tok".to_string()),
        });
        assert_eq!(body["createdAt"][".sv"], "timestamp");
        assert!(body["thumbnailUrl"].is_null());
        assert_eq!(body["deleteToken"], "tok");
        assert_eq!(body["public_id"], "orb");
    }

    #[test]
    fn test_classify_stream_events() {
        let event = |name: &str| StreamEvent {
            event: name.to_string(),
            data: String::new(),
        };
        assert_eq!(classify(&event("put")), StreamAction::Refresh);
        assert_eq!(classify(&event("patch")), StreamAction::Refresh);
        assert_eq!(classify(&event("keep-alive")), StreamAction::Ignore);
        assert!(matches!(classify(&event("cancel")), StreamAction::Close(_)));
    }

    fn record(key: &str) -> AssetRecord {
        NewAssetRecord {
            name: "Orb".to_string(),
            model_url: "https://cdn/orb.glb".to_string(),
            thumbnail_url: None,
            public_id: "orb".to_string(),
            delete_token: None,
        }
        .into_record(key, 0)
    }

    fn lines(raw: &[&str]) -> impl Iterator<Item = std::io::Result<String>> {
        raw.iter().map(|l| Ok((*l).to_string())).collect::<Vec<_>>().into_iter()
    }

    fn recording_sink() -> (SnapshotSink, Arc<Mutex<Vec<usize>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_inner = seen.clone();
        let sink: SnapshotSink = Arc::new(move |snapshot: Vec<AssetRecord>| {
            seen_inner.lock().unwrap().push(snapshot.len());
        });
        (sink, seen)
    }

    #[test]
    fn test_failed_refresh_keeps_stream_alive() {
        let (sink, seen) = recording_sink();
        let attempts = AtomicUsize::new(0);
        let active = AtomicBool::new(true);

        let result = follow_stream(
            lines(&[
                "event: put",
                r#"data: {"path":"/","data":null}"#,
                "",
                "event: keep-alive",
                "data: null",
                "",
                "event: patch",
                r#"data: {"path":"/-a","data":{}}"#,
                "",
            ]),
            &active,
            &sink,
            || {
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(Error::Transport("connection reset".to_string()))
                } else {
                    Ok(vec![record("-a"), record("-b")])
                }
            },
        );

        assert_eq!(*seen.lock().unwrap(), vec![0, 2]);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert!(matches!(result, Err(Error::Subscription(_))));
    }

    #[test]
    fn test_cancel_event_ends_stream() {
        let (sink, seen) = recording_sink();
        let active = AtomicBool::new(true);

        let result = follow_stream(
            lines(&["event: cancel", "data: null", "", "event: put", "data: {}", ""]),
            &active,
            &sink,
            || Ok(vec![record("-a")]),
        );

        assert!(seen.lock().unwrap().is_empty());
        match result {
            Err(Error::Subscription(reason)) => assert!(reason.contains("permission denied")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_released_subscription_stops_delivery() {
        let (sink, seen) = recording_sink();
        let active = AtomicBool::new(false);

        let result = follow_stream(lines(&["event: put", "data: {}", ""]), &active, &sink, || {
            Ok(vec![record("-a")])
        });

        assert!(result.is_ok());
        assert!(seen.lock().unwrap().is_empty());
    }
}
