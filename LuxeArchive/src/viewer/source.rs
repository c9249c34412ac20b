//! Resolving the viewer argument to something the asset server can load

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use luxevault::gltf_import::ensure_decodable;

use crate::viewer::types::ModelSource;

/// A model location split into the asset root and the file inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub source: ModelSource,
    /// Directory the asset server is rooted at
    pub asset_dir: PathBuf,
    /// File name relative to `asset_dir`
    pub file_name: String,
}

impl ResolvedSource {
    /// Resolve a path or URL. Remote models are stored under `download_dir`.
    pub fn resolve(arg: &str, download_dir: &Path) -> Self {
        if is_remote(arg) {
            return Self {
                source: ModelSource::Remote(arg.to_string()),
                asset_dir: download_dir.to_path_buf(),
                file_name: format!("asset-{}.{}", std::process::id(), remote_extension(arg)),
            };
        }

        let path = std::path::absolute(arg).unwrap_or_else(|_| PathBuf::from(arg));
        let asset_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            source: ModelSource::Local(path),
            asset_dir,
            file_name,
        }
    }

    /// Where a remote download is written
    pub fn download_path(&self) -> PathBuf {
        self.asset_dir.join(&self.file_name)
    }

    /// Short name for the window title
    pub fn display_name(&self) -> String {
        match &self.source {
            ModelSource::Local(_) => self.file_name.clone(),
            ModelSource::Remote(url) => url
                .rsplit('/')
                .next()
                .and_then(|segment| segment.split(['?', '#']).next())
                .filter(|segment| !segment.is_empty())
                .unwrap_or("Remote Asset")
                .to_string(),
        }
    }
}

/// Default download directory for remote models
pub fn default_download_dir() -> PathBuf {
    std::env::temp_dir().join("luxe-viewer")
}

fn is_remote(arg: &str) -> bool {
    let lower = arg.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// `gltf` when the URL path says so, `glb` otherwise
fn remote_extension(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    if path.to_ascii_lowercase().ends_with(".gltf") {
        "gltf"
    } else {
        "glb"
    }
}

/// Download `url` to `dest` on a background thread and post the outcome
pub fn spawn_download(url: String, dest: PathBuf, inbox: Arc<Mutex<Option<Result<String, String>>>>) {
    std::thread::spawn(move || {
        let outcome = download(&url, &dest).map_err(|e| e.to_string());
        match &outcome {
            Ok(_) => tracing::info!("Downloaded {} to {}", url, dest.display()),
            Err(e) => tracing::warn!("Download of {} failed: {}", url, e),
        }
        if let Ok(mut slot) = inbox.lock() {
            *slot = Some(outcome);
        }
    });
}

/// Refuse models whose required extensions the asset loader cannot decode
pub fn check_local_model(path: &Path) -> Result<(), String> {
    let file = std::fs::File::open(path).map_err(|e| format!("cannot open {}: {e}", path.display()))?;
    ensure_decodable(std::io::BufReader::new(file)).map_err(|e| e.to_string())
}

fn download(url: &str, dest: &Path) -> luxevault::Result<String> {
    let bytes = luxevault::media::fetch_bytes(url)?;
    ensure_decodable(bytes.as_slice())?;
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(dest, bytes)?;
    Ok(dest
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default())
}
