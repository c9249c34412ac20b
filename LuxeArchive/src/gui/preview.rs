//! Viewer process launcher
//!
//! Spawns the `luxe-viewer` binary for the selected asset. Only one viewer
//! runs at a time; opening another asset replaces it.

use std::process::{Child, Command};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use luxevault::record::AssetRecord;

use crate::VIEWER_BINARY;

/// Global handle to the viewer process
static VIEWER_PROCESS: OnceLock<Arc<Mutex<Option<Child>>>> = OnceLock::new();

fn viewer_handle() -> &'static Arc<Mutex<Option<Child>>> {
    VIEWER_PROCESS.get_or_init(|| Arc::new(Mutex::new(None)))
}

/// Open the viewer window for `record`
pub fn launch_viewer(record: &AssetRecord) -> Result<(), String> {
    kill_preview_process();

    let binary = find_viewer_binary();
    tracing::info!("Opening viewer for '{}'", record.name);

    let child = Command::new(&binary)
        .arg(&record.model_url)
        .arg("--title")
        .arg(&record.name)
        .spawn()
        .map_err(|e| format!("Failed to open viewer: {e}"))?;

    if let Ok(mut handle) = viewer_handle().lock() {
        *handle = Some(child);
    }

    // Forget the handle once the window is closed
    std::thread::spawn(|| {
        loop {
            std::thread::sleep(Duration::from_millis(500));

            let Ok(mut handle) = viewer_handle().lock() else {
                break;
            };
            let Some(child) = handle.as_mut() else {
                break;
            };
            match child.try_wait() {
                Ok(None) => {}
                Ok(Some(_)) | Err(_) => {
                    *handle = None;
                    break;
                }
            }
        }
    });

    Ok(())
}

/// Kill any running viewer (also called on app exit)
pub fn kill_preview_process() {
    if let Ok(mut handle) = viewer_handle().lock() {
        if let Some(mut child) = handle.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Sibling of the running executable, else whatever is on PATH
fn find_viewer_binary() -> String {
    if let Some(parent) = std::env::current_exe().ok().as_deref().and_then(std::path::Path::parent) {
        let sibling = parent.join(format!("{VIEWER_BINARY}{}", std::env::consts::EXE_SUFFIX));
        if sibling.exists() {
            return sibling.to_string_lossy().to_string();
        }
    }

    VIEWER_BINARY.to_string()
}
