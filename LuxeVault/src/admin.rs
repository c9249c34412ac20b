//! Admin upload form and the two-stage upload flow
//!
//! Submission order is fixed: model (`raw`), then thumbnail (`image`), then
//! one metadata write referencing both. Validation happens before any
//! network call. When a later stage fails after the model upload succeeded,
//! one best-effort cleanup call discards the orphaned model via its
//! deletion token.

use std::sync::Arc;

use crate::error::{Error, Result, ValidationError};
use crate::gltf_import::unsupported_extensions;
use crate::media::{MediaHost, ResourceKind, UploadFile, UploadedMedia};
use crate::record::NewAssetRecord;
use crate::store::AssetStore;

/// Only binary glTF is accepted for models
pub const MODEL_EXTENSION: &str = "glb";

/// Message shown after a successful submission
pub const SUCCESS_MESSAGE: &str = "Inventory Updated Successfully.";

/// Fields of the admin upload form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub name: String,
    model: Option<UploadFile>,
    thumbnail: Option<UploadFile>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Select the model file. A non-`.glb` file, or one that requires a
    /// compression extension the viewer cannot decode, is rejected and the
    /// previous selection is kept.
    pub fn select_model(&mut self, file: UploadFile) -> std::result::Result<(), ValidationError> {
        if file.extension().as_deref() != Some(MODEL_EXTENSION) {
            return Err(ValidationError::WrongModelExtension);
        }
        if let Some(extension) = required_compression(&file) {
            return Err(ValidationError::CompressedModel { extension });
        }
        self.model = Some(file);
        Ok(())
    }

    pub fn select_thumbnail(&mut self, file: UploadFile) {
        self.thumbnail = Some(file);
    }

    pub fn model(&self) -> Option<&UploadFile> {
        self.model.as_ref()
    }

    pub fn thumbnail(&self) -> Option<&UploadFile> {
        self.thumbnail.as_ref()
    }

    /// Whether every required field is filled
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check required fields; the model extension is re-checked in case
    /// the selection bypassed [`select_model`](Self::select_model)
    pub fn validate(&self) -> std::result::Result<(&str, &UploadFile, &UploadFile), ValidationError> {
        let name = self.name.trim();
        match (&self.model, &self.thumbnail) {
            (Some(model), Some(thumbnail)) if !name.is_empty() => {
                if model.extension().as_deref() != Some(MODEL_EXTENSION) {
                    return Err(ValidationError::WrongModelExtension);
                }
                Ok((name, model, thumbnail))
            }
            _ => Err(ValidationError::MissingFields),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Undecodable compression required by the model's header. Unreadable or
/// unrecognized contents are left for the upload to report.
fn required_compression(file: &UploadFile) -> Option<String> {
    let reader = file.open().ok()?;
    match unsupported_extensions(reader) {
        Ok(found) => found.into_iter().next(),
        Err(e) => {
            tracing::debug!("Skipping compression check for {}: {}", file.file_name(), e);
            None
        }
    }
}

/// Stage of a running submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStage {
    UploadingModel,
    UploadingThumbnail,
    WritingRecord,
}

impl SubmitStage {
    /// Number of stages in a submission
    pub const COUNT: usize = 3;

    /// 1-indexed position of this stage
    pub fn step(self) -> usize {
        match self {
            Self::UploadingModel => 1,
            Self::UploadingThumbnail => 2,
            Self::WritingRecord => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UploadingModel => "Uploading model",
            Self::UploadingThumbnail => "Uploading thumbnail",
            Self::WritingRecord => "Writing record",
        }
    }
}

/// Progress callback for submissions
pub type SubmitProgressCallback<'a> = &'a (dyn Fn(SubmitStage) + Sync + Send);

/// Result of a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Store key of the new record
    pub key: String,
    /// The body that was written
    pub record: NewAssetRecord,
}

/// Runs uploads and writes against a store and a media host
#[derive(Clone)]
pub struct AdminController {
    store: Arc<dyn AssetStore>,
    media: Arc<dyn MediaHost>,
}

impl AdminController {
    pub fn new(store: Arc<dyn AssetStore>, media: Arc<dyn MediaHost>) -> Self {
        Self { store, media }
    }

    pub fn store(&self) -> &Arc<dyn AssetStore> {
        &self.store
    }

    /// Validate, upload model then thumbnail, then write the record.
    ///
    /// On success the form is cleared. On any failure the form is left
    /// exactly as it was so the user can retry.
    pub fn submit(&self, form: &mut UploadForm) -> Result<SubmitOutcome> {
        self.submit_with_progress(form, &|_| {})
    }

    /// [`submit`](Self::submit) reporting each stage as it starts
    pub fn submit_with_progress(
        &self,
        form: &mut UploadForm,
        progress: SubmitProgressCallback,
    ) -> Result<SubmitOutcome> {
        let (name, model_file, thumbnail_file) = form.validate()?;
        let name = name.to_string();

        progress(SubmitStage::UploadingModel);
        let model = self.media.upload(model_file, ResourceKind::Raw)?;

        let outcome = self.finish_submit(name, &model, thumbnail_file, progress);
        match outcome {
            Ok(outcome) => {
                form.clear();
                tracing::info!("Asset '{}' synced as {}", outcome.record.name, outcome.key);
                Ok(outcome)
            }
            Err(e) => {
                self.discard_orphan(&model);
                Err(e)
            }
        }
    }

    fn finish_submit(
        &self,
        name: String,
        model: &UploadedMedia,
        thumbnail_file: &UploadFile,
        progress: SubmitProgressCallback,
    ) -> Result<SubmitOutcome> {
        progress(SubmitStage::UploadingThumbnail);
        let thumbnail = self.media.upload(thumbnail_file, ResourceKind::Image)?;

        let record = NewAssetRecord {
            name,
            model_url: model.secure_url.clone(),
            thumbnail_url: Some(thumbnail.secure_url),
            public_id: model.public_id.clone(),
            delete_token: model.delete_token.clone(),
        };
        progress(SubmitStage::WritingRecord);
        let key = self.store.push(record.clone())?;
        Ok(SubmitOutcome { key, record })
    }

    /// Best effort: a failed cleanup is logged, never surfaced
    fn discard_orphan(&self, model: &UploadedMedia) {
        let Some(token) = model.delete_token.as_deref() else {
            tracing::warn!("Orphaned upload {} has no delete token", model.public_id);
            return;
        };
        match self.media.delete_by_token(token) {
            Ok(()) => tracing::info!("Discarded orphaned upload {}", model.public_id),
            Err(e) => tracing::warn!("Could not discard orphaned upload {}: {}", model.public_id, e),
        }
    }

    /// Remove one record by key. No confirmation, no soft delete.
    pub fn purge(&self, key: &str) -> Result<()> {
        self.store.remove(key)
    }
}

/// User-facing text for a failed submission
pub fn failure_message(err: &Error) -> String {
    match err {
        Error::Validation(v) => v.to_string(),
        Error::UploadRejected { message } if !message.is_empty() => message.clone(),
        other => {
            let text = other.to_string();
            if text.is_empty() {
                "An unexpected error occurred during sync.".to_string()
            } else {
                text
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_model_rejects_other_extensions() {
        let mut form = UploadForm::new();
        let err = form
            .select_model(UploadFile::from_bytes("model.gltf", vec![]))
            .unwrap_err();
        assert_eq!(err, ValidationError::WrongModelExtension);
        assert!(form.model().is_none());
    }

    #[test]
    fn test_rejected_model_keeps_previous_selection() {
        let mut form = UploadForm::new();
        form.select_model(UploadFile::from_bytes("first.GLB", vec![1])).unwrap();
        assert!(form.select_model(UploadFile::from_bytes("second.obj", vec![2])).is_err());
        assert_eq!(form.model().map(UploadFile::file_name), Some("first.GLB"));
    }

    #[test]
    fn test_select_model_rejects_draco_compression() {
        let draco = br#"{"asset":{"version":"2.0"},"extensionsRequired":["KHR_draco_mesh_compression"]}"#;
        let mut form = UploadForm::new();
        let err = form
            .select_model(UploadFile::from_bytes("compressed.glb", draco.to_vec()))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::CompressedModel {
                extension: "KHR_draco_mesh_compression".to_string()
            }
        );
        assert!(form.model().is_none());

        let plain = br#"{"asset":{"version":"2.0"}}"#;
        form.select_model(UploadFile::from_bytes("plain.glb", plain.to_vec())).unwrap();
        assert_eq!(form.model().map(UploadFile::file_name), Some("plain.glb"));
    }

    #[test]
    fn test_validate_requires_every_field() {
        let mut form = UploadForm::new();
        assert_eq!(form.validate().unwrap_err(), ValidationError::MissingFields);

        form.set_name("   ");
        form.select_model(UploadFile::from_bytes("m.glb", vec![])).unwrap();
        form.select_thumbnail(UploadFile::from_bytes("t.png", vec![]));
        assert_eq!(form.validate().unwrap_err(), ValidationError::MissingFields);

        form.set_name("Chronos");
        assert!(form.is_complete());
    }

    #[test]
    fn test_failure_message_prefers_host_text() {
        let err = Error::UploadRejected {
            message: "Upload preset not found".to_string(),
        };
        assert_eq!(failure_message(&err), "Upload preset not found");
        assert_eq!(
            failure_message(&Error::Validation(ValidationError::MissingFields)),
            "Asset Title, 3D Model, and Thumbnail are all required."
        );
    }
}
