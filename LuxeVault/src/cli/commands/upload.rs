//! CLI command for adding an asset to the vault

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use super::session::require_admin;
use crate::admin::{AdminController, SUCCESS_MESSAGE, SubmitStage, UploadForm, failure_message};
use crate::cli::progress::{DISK, PACKAGE, PICTURE, print_done, print_step};
use crate::config::VaultConfig;
use crate::media::UploadFile;
use crate::media::cloudinary::CloudinaryHost;
use crate::store::firebase::FirebaseStore;

pub fn execute(name: &str, model: &Path, thumbnail: &Path, quiet: bool) -> anyhow::Result<()> {
    let config = VaultConfig::load();
    require_admin(&config)?;

    let mut form = UploadForm::new();
    form.set_name(name);
    form.select_model(UploadFile::from_path(model))?;
    form.select_thumbnail(UploadFile::from_path(thumbnail));

    let controller = AdminController::new(
        Arc::new(FirebaseStore::new(&config)),
        Arc::new(CloudinaryHost::new(&config)),
    );

    let started = Instant::now();
    let report = |stage: SubmitStage| {
        if quiet {
            return;
        }
        let emoji = match stage {
            SubmitStage::UploadingModel => &PACKAGE,
            SubmitStage::UploadingThumbnail => &PICTURE,
            SubmitStage::WritingRecord => &DISK,
        };
        print_step(
            stage.step(),
            SubmitStage::COUNT,
            emoji,
            &format!("{}...", stage.as_str()),
        );
    };

    match controller.submit_with_progress(&mut form, &report) {
        Ok(outcome) => {
            if !quiet {
                print_done(started.elapsed());
            }
            println!("{SUCCESS_MESSAGE} ({})", outcome.key);
            Ok(())
        }
        Err(e) => anyhow::bail!(failure_message(&e)),
    }
}
