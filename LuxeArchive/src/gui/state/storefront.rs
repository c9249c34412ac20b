//! Storefront screen state

use std::path::PathBuf;

use floem::ext_event::create_ext_action;
use floem::reactive::Scope;
use floem::prelude::*;
use luxevault::catalog::Catalog;
use luxevault::record::AssetRecord;
use luxevault::session::Route;

use super::AppState;

#[derive(Clone)]
pub struct StorefrontState {
    pub catalog: RwSignal<Catalog>,

    // Login modal
    pub login_open: RwSignal<bool>,
    pub login_identifier: RwSignal<String>,
    pub login_passcode: RwSignal<String>,
    pub login_error: RwSignal<Option<String>>,

    // Detail view
    pub detail_status: RwSignal<String>,
    pub downloading: RwSignal<bool>,
}

impl StorefrontState {
    pub fn new(catalog: RwSignal<Catalog>) -> Self {
        Self {
            catalog,
            login_open: RwSignal::new(false),
            login_identifier: RwSignal::new(String::new()),
            login_passcode: RwSignal::new(String::new()),
            login_error: RwSignal::new(None),
            detail_status: RwSignal::new(String::new()),
            downloading: RwSignal::new(false),
        }
    }

    /// Admin button: straight through when authorized, otherwise the login modal
    pub fn request_admin(&self, app: &AppState) {
        if app.session.is_authorized() {
            app.navigate(Route::Admin);
        } else {
            self.login_error.set(None);
            self.login_open.set(true);
        }
    }

    pub fn close_login(&self) {
        self.login_open.set(false);
        self.login_passcode.set(String::new());
        self.login_error.set(None);
    }

    /// Check the entered pair; a match persists the flag and opens the admin screen
    pub fn submit_login(&self, app: &AppState) {
        let identifier = self.login_identifier.get_untracked();
        let passcode = self.login_passcode.get_untracked();

        match app.session.login(identifier.trim(), &passcode) {
            Ok(_) => {
                self.close_login();
                self.login_identifier.set(String::new());
                app.navigate(Route::Admin);
            }
            Err(e) => self.login_error.set(Some(e.to_string())),
        }
    }

    pub fn open_detail(&self, key: &str) {
        self.detail_status.set(String::new());
        self.catalog.update(|c| {
            c.open(key);
        });
    }

    pub fn close_detail(&self) {
        self.catalog.update(Catalog::close);
    }

    pub fn selected(&self) -> Option<AssetRecord> {
        self.catalog.with(|c| c.selected().cloned())
    }

    pub fn selected_untracked(&self) -> Option<AssetRecord> {
        self.catalog.with_untracked(|c| c.selected().cloned())
    }

    /// Key of the open asset; tracks the catalog
    pub fn selected_key(&self) -> Option<String> {
        self.catalog.with(|c| c.selected().map(|r| r.id.clone()))
    }

    /// Ask where to save the raw model, then download it in the background
    pub fn download(&self, record: &AssetRecord) {
        if self.downloading.get_untracked() {
            return;
        }
        let dialog = rfd::FileDialog::new()
            .set_title("Save Model")
            .set_file_name(record.download_file_name())
            .add_filter("Binary glTF", &["glb"]);
        let Some(path) = dialog.save_file() else {
            return;
        };

        let status = self.detail_status;
        let downloading = self.downloading;
        downloading.set(true);
        status.set("Downloading...".to_string());

        let send = create_ext_action(Scope::new(), move |result: Result<PathBuf, String>| {
            downloading.set(false);
            match result {
                Ok(path) => status.set(format!("Saved to {}", path.display())),
                Err(e) => status.set(format!("Download failed: {e}")),
            }
        });

        let url = record.model_url.clone();
        rayon::spawn(move || {
            let result = luxevault::media::fetch_bytes(&url)
                .and_then(|bytes| std::fs::write(&path, bytes).map_err(Into::into))
                .map(|()| path)
                .map_err(|e| e.to_string());
            if let Err(e) = &result {
                tracing::warn!("Download of {} failed: {}", url, e);
            }
            send(result);
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use luxevault::config::VaultConfig;
    use luxevault::media::cloudinary::CloudinaryHost;
    use luxevault::session::MemoryStorage;
    use luxevault::store::memory::MemoryStore;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::gui::state::AdminState;

    fn test_app() -> AppState {
        let config = VaultConfig::default();
        let media = Arc::new(CloudinaryHost::new(&config));
        AppState::with_backends(
            config,
            Arc::new(MemoryStorage::new()),
            Arc::new(MemoryStore::new()),
            media,
        )
    }

    #[test]
    fn test_anonymous_admin_request_opens_login() {
        let app = test_app();
        let state = StorefrontState::new(RwSignal::new(Catalog::new()));

        state.request_admin(&app);
        assert!(state.login_open.get_untracked());
        assert_eq!(app.route.get_untracked(), Route::Storefront);

        app.navigate(Route::Admin);
        assert_eq!(app.route.get_untracked(), Route::Storefront);
    }

    #[test]
    fn test_wrong_passcode_keeps_modal_open() {
        let app = test_app();
        let state = StorefrontState::new(RwSignal::new(Catalog::new()));
        state.request_admin(&app);

        state.login_identifier.set("vault@archive.luxe".to_string());
        state.login_passcode.set("nope".to_string());
        state.submit_login(&app);

        assert_eq!(state.login_error.get_untracked().as_deref(), Some("Authorization Failed."));
        assert!(state.login_open.get_untracked());
        assert!(!app.session.is_authorized());
    }

    fn record(key: &str, name: &str) -> AssetRecord {
        luxevault::record::NewAssetRecord {
            name: name.to_string(),
            model_url: format!("https://cdn/{key}.glb"),
            thumbnail_url: None,
            public_id: key.to_string(),
            delete_token: None,
        }
        .into_record(key, 0)
    }

    #[test]
    fn test_selection_key_survives_unrelated_snapshots() {
        let catalog = RwSignal::new(Catalog::new());
        let state = StorefrontState::new(catalog);
        catalog.update(|c| c.apply_snapshot(vec![record("-a", "Orb"), record("-b", "Crown")]));

        state.open_detail("-a");
        let key = state.selected_key();
        assert_eq!(key.as_deref(), Some("-a"));

        catalog.update(|c| {
            c.apply_snapshot(vec![record("-a", "Orb"), record("-b", "Crown"), record("-c", "Case")]);
        });
        assert_eq!(state.selected_key(), key);
        assert_eq!(state.selected_untracked().map(|r| r.name), Some("Orb".to_string()));

        catalog.update(|c| c.apply_snapshot(vec![record("-b", "Crown")]));
        assert_eq!(state.selected_key(), None);
    }

    #[test]
    fn test_login_then_logout() {
        let app = test_app();
        let state = StorefrontState::new(RwSignal::new(Catalog::new()));
        let before = app.epoch.get_untracked();

        state.login_identifier.set(" vault@archive.luxe ".to_string());
        state.login_passcode.set("James Bond 27".to_string());
        state.submit_login(&app);

        assert_eq!(app.route.get_untracked(), Route::Admin);
        assert!(!state.login_open.get_untracked());
        assert!(!app.is_current(before));

        AdminState::new(state.catalog).logout(&app);
        assert_eq!(app.route.get_untracked(), Route::Storefront);
        assert!(!app.session.is_authorized());
    }
}
