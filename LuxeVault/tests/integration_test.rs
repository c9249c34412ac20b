use luxevault::prelude::*;
use luxevault::admin::{SUCCESS_MESSAGE, failure_message};
use luxevault::store::SnapshotSink;
use pretty_assertions::assert_eq;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

/// Media host that records every call and can be told to reject one kind
#[derive(Default)]
struct RecordingHost {
    uploads: Mutex<Vec<(String, ResourceKind)>>,
    deleted_tokens: Mutex<Vec<String>>,
    reject: Option<ResourceKind>,
}

impl RecordingHost {
    fn rejecting(kind: ResourceKind) -> Self {
        Self {
            reject: Some(kind),
            ..Self::default()
        }
    }

    fn upload_kinds(&self) -> Vec<ResourceKind> {
        self.uploads.lock().unwrap().iter().map(|(_, k)| *k).collect()
    }

    fn deleted(&self) -> Vec<String> {
        self.deleted_tokens.lock().unwrap().clone()
    }
}

impl MediaHost for RecordingHost {
    fn upload(&self, file: &UploadFile, kind: ResourceKind) -> luxevault::Result<UploadedMedia> {
        self.uploads
            .lock()
            .unwrap()
            .push((file.file_name().to_string(), kind));
        if self.reject == Some(kind) {
            return Err(Error::UploadRejected {
                message: "Upload preset must be whitelisted for unsigned uploads".to_string(),
            });
        }
        let stem = file.file_name().rsplit_once('.').map_or(file.file_name(), |(s, _)| s);
        Ok(UploadedMedia {
            secure_url: format!("https://res.example/{}/{}", kind.as_str(), file.file_name()),
            public_id: format!("portfolio/{stem}_a1b2c3d4e5f6"),
            delete_token: Some(format!("token-{stem}")),
        })
    }

    fn delete_by_token(&self, token: &str) -> luxevault::Result<()> {
        self.deleted_tokens.lock().unwrap().push(token.to_string());
        Ok(())
    }
}

/// Store whose writes are always refused
struct ReadOnlyStore;

impl AssetStore for ReadOnlyStore {
    fn fetch(&self) -> luxevault::Result<Vec<AssetRecord>> {
        Ok(Vec::new())
    }

    fn push(&self, _record: NewAssetRecord) -> luxevault::Result<String> {
        Err(Error::HttpStatus {
            status: 401,
            message: "Permission denied".to_string(),
        })
    }

    fn remove(&self, _key: &str) -> luxevault::Result<()> {
        Err(Error::HttpStatus {
            status: 401,
            message: "Permission denied".to_string(),
        })
    }

    fn subscribe(&self, sink: SnapshotSink) -> Subscription {
        sink(Vec::new());
        Subscription::new(Arc::new(AtomicBool::new(true)))
    }
}

fn complete_form() -> UploadForm {
    let mut form = UploadForm::new();
    form.set_name("Chronos Royale");
    form.select_model(UploadFile::from_bytes("chronos.glb", b"glTF".to_vec()))
        .unwrap();
    form.select_thumbnail(UploadFile::from_bytes("chronos.png", vec![0x89, b'P', b'N', b'G']));
    form
}

fn controller(store: &MemoryStore, host: &Arc<RecordingHost>) -> AdminController {
    AdminController::new(Arc::new(store.clone()), host.clone())
}

#[test]
fn test_missing_fields_make_no_network_calls() {
    let store = MemoryStore::new();
    let host = Arc::new(RecordingHost::default());
    let admin = controller(&store, &host);

    let mut form = complete_form();
    form.set_name("");
    let err = admin.submit(&mut form).unwrap_err();

    assert_eq!(
        failure_message(&err),
        "Asset Title, 3D Model, and Thumbnail are all required."
    );
    assert!(host.upload_kinds().is_empty());
    assert!(store.is_empty());
}

#[test]
fn test_wrong_extension_rejected_before_upload() {
    let mut form = UploadForm::new();
    let err = form
        .select_model(UploadFile::from_bytes("chronos.fbx", vec![]))
        .unwrap_err();
    assert_eq!(err.to_string(), "3D Asset must be a .glb file.");
    assert!(form.model().is_none());
}

#[test]
fn test_successful_submit_writes_one_record() {
    let store = MemoryStore::new();
    let host = Arc::new(RecordingHost::default());
    let admin = controller(&store, &host);

    let mut form = complete_form();
    let outcome = admin.submit(&mut form).unwrap();

    assert_eq!(host.upload_kinds(), vec![ResourceKind::Raw, ResourceKind::Image]);
    assert_eq!(form, UploadForm::new());

    let records = store.fetch().unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, outcome.key);
    assert_eq!(record.name, "Chronos Royale");
    assert_eq!(record.model_url, "https://res.example/raw/chronos.glb");
    assert_eq!(
        record.thumbnail_url.as_deref(),
        Some("https://res.example/image/chronos.png")
    );
    assert_eq!(record.public_id, "portfolio/chronos_a1b2c3d4e5f6");
    assert_eq!(record.delete_token.as_deref(), Some("token-chronos"));
    assert!(host.deleted().is_empty());
}

#[test]
fn test_thumbnail_failure_keeps_form_and_discards_model() {
    let store = MemoryStore::new();
    let host = Arc::new(RecordingHost::rejecting(ResourceKind::Image));
    let admin = controller(&store, &host);

    let mut form = complete_form();
    let before = form.clone();
    let err = admin.submit(&mut form).unwrap_err();

    assert_eq!(
        failure_message(&err),
        "Upload preset must be whitelisted for unsigned uploads"
    );
    assert_eq!(form, before);
    assert!(store.is_empty());
    assert_eq!(host.deleted(), vec!["token-chronos".to_string()]);
}

#[test]
fn test_model_failure_uploads_nothing_else() {
    let store = MemoryStore::new();
    let host = Arc::new(RecordingHost::rejecting(ResourceKind::Raw));
    let admin = controller(&store, &host);

    let mut form = complete_form();
    assert!(admin.submit(&mut form).is_err());
    assert_eq!(host.upload_kinds(), vec![ResourceKind::Raw]);
    assert!(host.deleted().is_empty());
    assert!(form.is_complete());
}

#[test]
fn test_failed_write_discards_model() {
    let host = Arc::new(RecordingHost::default());
    let admin = AdminController::new(Arc::new(ReadOnlyStore), host.clone());

    let mut form = complete_form();
    let err = admin.submit(&mut form).unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 401, .. }));
    assert!(form.is_complete());
    assert_eq!(host.deleted(), vec!["token-chronos".to_string()]);
}

#[test]
fn test_purge_removes_exactly_one() {
    let store = MemoryStore::new();
    let host = Arc::new(RecordingHost::default());
    let admin = controller(&store, &host);

    let mut keys = Vec::new();
    for name in ["Aurum", "Bezel", "Cadence"] {
        let mut form = complete_form();
        form.set_name(name);
        keys.push(admin.submit(&mut form).unwrap().key);
    }

    admin.purge(&keys[1]).unwrap();

    let names: Vec<String> = store.fetch().unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["Aurum".to_string(), "Cadence".to_string()]);
}

#[test]
fn test_storefront_follows_live_snapshots() {
    let store = MemoryStore::new();
    let host = Arc::new(RecordingHost::default());
    let admin = controller(&store, &host);

    let catalog = Arc::new(Mutex::new(Catalog::new()));
    let sink_catalog = catalog.clone();
    let subscription = store.subscribe(Arc::new(move |snapshot| {
        sink_catalog.lock().unwrap().apply_snapshot(snapshot);
    }));
    assert!(catalog.lock().unwrap().is_empty());

    let key = admin.submit(&mut complete_form()).unwrap().key;
    {
        let catalog = catalog.lock().unwrap();
        let cards = catalog.cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].reference, "a1b2c3d4e5f6"[4..]);
        assert_eq!(cards[0].name, "Chronos Royale");
    }

    admin.purge(&key).unwrap();
    assert!(catalog.lock().unwrap().is_empty());

    subscription.cancel();
    admin.submit(&mut complete_form()).unwrap();
    assert!(catalog.lock().unwrap().is_empty());
}

#[test]
fn test_session_gate_round_trip() {
    let storage = Arc::new(MemoryStorage::new());
    let session = SessionContext::new(
        storage.clone(),
        Credentials::new("vault@archive.luxe", "James Bond 27"),
    );

    assert!(session.login("vault@archive.luxe", "james bond 27").is_err());
    assert_eq!(session.resolve(Route::Admin), Route::Storefront);

    session.login("vault@archive.luxe", "James Bond 27").unwrap();
    let restarted = SessionContext::new(storage, Credentials::new("vault@archive.luxe", "James Bond 27"));
    assert_eq!(restarted.resolve(Route::Admin), Route::Admin);
    assert_eq!(SUCCESS_MESSAGE, "Inventory Updated Successfully.");
}
