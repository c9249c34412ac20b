//! Admin screen state and its background operations

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use floem::action::exec_after;
use floem::ext_event::create_ext_action;
use floem::reactive::Scope;
use floem::prelude::*;
use luxevault::admin::{AdminController, SUCCESS_MESSAGE, SubmitOutcome, SubmitStage, UploadForm, failure_message};
use luxevault::catalog::Catalog;
use luxevault::media::UploadFile;
use luxevault::session::Route;

use super::AppState;

/// Result line under the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Success(String),
    Error(String),
}

#[derive(Clone)]
pub struct AdminState {
    pub catalog: RwSignal<Catalog>,

    // Upload form
    pub name: RwSignal<String>,
    pub form: RwSignal<UploadForm>,
    /// Local path of the chosen thumbnail, for the preview
    pub thumbnail_path: RwSignal<Option<PathBuf>>,

    pub submitting: RwSignal<bool>,
    /// Stage label shown while submitting
    pub stage: RwSignal<String>,
    pub status: RwSignal<Option<StatusMessage>>,
}

impl AdminState {
    pub fn new(catalog: RwSignal<Catalog>) -> Self {
        Self {
            catalog,
            name: RwSignal::new(String::new()),
            form: RwSignal::new(UploadForm::new()),
            thumbnail_path: RwSignal::new(None),
            submitting: RwSignal::new(false),
            stage: RwSignal::new(String::new()),
            status: RwSignal::new(None),
        }
    }

    /// Pick the model file. A non-`.glb` pick is rejected and the previous
    /// selection stays.
    pub fn choose_model(&self) {
        let dialog = rfd::FileDialog::new()
            .set_title("Select 3D Asset")
            .add_filter("Binary glTF", &["glb"])
            .add_filter("All Files", &["*"]);
        if let Some(path) = dialog.pick_file() {
            self.select_model(UploadFile::from_path(path));
        }
    }

    pub fn select_model(&self, file: UploadFile) {
        let mut outcome = Ok(());
        self.form.update(|form| outcome = form.select_model(file));
        match outcome {
            Ok(()) => self.status.set(None),
            Err(e) => self.status.set(Some(StatusMessage::Error(e.to_string()))),
        }
    }

    pub fn choose_thumbnail(&self) {
        let dialog = rfd::FileDialog::new()
            .set_title("Select Thumbnail")
            .add_filter("Images", &["png", "jpg", "jpeg", "webp", "gif"]);
        if let Some(path) = dialog.pick_file() {
            self.form
                .update(|form| form.select_thumbnail(UploadFile::from_path(&path)));
            self.thumbnail_path.set(Some(path));
        }
    }

    pub fn model_label(&self) -> String {
        self.form.with(|form| {
            form.model()
                .map_or_else(|| "No file selected".to_string(), |f| f.file_name().to_string())
        })
    }

    pub fn thumbnail_label(&self) -> String {
        self.form.with(|form| {
            form.thumbnail()
                .map_or_else(|| "No file selected".to_string(), |f| f.file_name().to_string())
        })
    }

    fn reset_form(&self) {
        self.name.set(String::new());
        self.form.set(UploadForm::new());
        self.thumbnail_path.set(None);
    }

    /// Validate on the UI thread, then upload and write on the rayon pool
    pub fn submit(&self, app: &AppState) {
        if self.submitting.get_untracked() {
            return;
        }

        let mut form = self.form.get_untracked();
        form.set_name(self.name.get_untracked());
        if let Err(e) = form.validate() {
            self.status.set(Some(StatusMessage::Error(e.to_string())));
            return;
        }

        self.submitting.set(true);
        self.status.set(None);

        let shared_stage: Arc<Mutex<Option<SubmitStage>>> = Arc::default();
        poll_stage(shared_stage.clone(), self.stage, self.submitting);

        let this = self.clone();
        let send = create_ext_action(Scope::new(), move |result: Result<SubmitOutcome, String>| {
            this.submitting.set(false);
            this.stage.set(String::new());
            match result {
                Ok(_) => {
                    this.reset_form();
                    this.status.set(Some(StatusMessage::Success(SUCCESS_MESSAGE.to_string())));
                }
                Err(message) => this.status.set(Some(StatusMessage::Error(message))),
            }
        });

        let controller = AdminController::new(app.store.clone(), app.media.clone());
        rayon::spawn(move || {
            let report = |stage: SubmitStage| {
                if let Ok(mut slot) = shared_stage.lock() {
                    *slot = Some(stage);
                }
            };
            let result = controller
                .submit_with_progress(&mut form, &report)
                .map_err(|e| failure_message(&e));
            send(result);
        });
    }

    /// Remove one record, no confirmation
    pub fn purge(&self, app: &AppState, key: String) {
        let status = self.status;
        let send = create_ext_action(Scope::new(), move |result: Result<(), String>| {
            if let Err(message) = result {
                status.set(Some(StatusMessage::Error(message)));
            }
        });

        let controller = AdminController::new(app.store.clone(), app.media.clone());
        rayon::spawn(move || {
            let result = controller.purge(&key).map_err(|e| {
                tracing::warn!("Purge of {} failed: {}", key, e);
                e.to_string()
            });
            send(result);
        });
    }

    pub fn logout(&self, app: &AppState) {
        if let Err(e) = app.session.logout() {
            tracing::warn!("Could not clear the admin session: {}", e);
        }
        app.navigate(Route::Storefront);
    }
}

/// Copy the current stage into `stage` until the submission finishes
fn poll_stage(shared: Arc<Mutex<Option<SubmitStage>>>, stage: RwSignal<String>, submitting: RwSignal<bool>) {
    if !submitting.get_untracked() {
        return;
    }
    if let Some(current) = shared.lock().ok().and_then(|slot| *slot) {
        stage.set(format!("{}/{} {}...", current.step(), SubmitStage::COUNT, current.as_str()));
    }
    exec_after(Duration::from_millis(100), move |_| {
        poll_stage(shared, stage, submitting);
    });
}
