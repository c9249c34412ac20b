//! Global application state

use std::sync::Arc;

use floem::prelude::*;
use luxevault::config::VaultConfig;
use luxevault::media::MediaHost;
use luxevault::media::cloudinary::CloudinaryHost;
use luxevault::session::{ClientStorage, Credentials, FileStorage, MemoryStorage, Route, SessionContext};
use luxevault::store::AssetStore;
use luxevault::store::firebase::FirebaseStore;

/// Global application state, created once at mount
#[derive(Clone)]
pub struct AppState {
    /// Current screen, always the resolved (guarded) route
    pub route: RwSignal<Route>,
    /// Bumped on every navigation; screens stop their background work when it moves on
    pub epoch: RwSignal<u64>,
    pub session: SessionContext,
    pub config: VaultConfig,
    pub store: Arc<dyn AssetStore>,
    pub media: Arc<dyn MediaHost>,
}

impl AppState {
    /// State backed by the configured database and media host
    pub fn new() -> Self {
        let config = VaultConfig::load();
        let storage: Arc<dyn ClientStorage> = match FileStorage::default_location() {
            Ok(storage) => Arc::new(storage),
            Err(e) => {
                tracing::warn!("No persistent session storage ({}); using memory", e);
                Arc::new(MemoryStorage::new())
            }
        };
        let store: Arc<dyn AssetStore> = Arc::new(FirebaseStore::new(&config));
        let media: Arc<dyn MediaHost> = Arc::new(CloudinaryHost::new(&config));
        Self::with_backends(config, storage, store, media)
    }

    pub fn with_backends(
        config: VaultConfig,
        storage: Arc<dyn ClientStorage>,
        store: Arc<dyn AssetStore>,
        media: Arc<dyn MediaHost>,
    ) -> Self {
        let session = SessionContext::new(storage, Credentials::from_config(&config));
        Self {
            route: RwSignal::new(Route::Storefront),
            epoch: RwSignal::new(0),
            session,
            config,
            store,
            media,
        }
    }

    /// Go to `requested`, subject to the admin gate
    pub fn navigate(&self, requested: Route) {
        let resolved = self.session.resolve(requested);
        if resolved != requested {
            tracing::info!("Admin screen requires a session, staying on the storefront");
        }
        self.epoch.update(|e| *e += 1);
        self.route.set(resolved);
    }

    /// Whether a screen mounted at `epoch` is still the visible one
    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch.get_untracked() == epoch
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
