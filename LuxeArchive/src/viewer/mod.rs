//! Interactive 3D viewer for a single catalog asset
//!
//! Runs as its own process (`luxe-viewer`) so the bevy event loop never
//! shares a thread with the floem UI. The asset server is rooted at the
//! model's directory (or the download directory for URLs) and the model is
//! loaded by file name.

pub mod camera;
pub mod normalize;
pub mod scene;
pub mod source;
pub mod types;
pub mod ui;

use bevy::prelude::*;
use bevy::window::WindowResolution;
use clap::Parser;
use luxevault::config::VaultConfig;
use luxevault::normalize::NormalizeSettings;

use crate::viewer::normalize::ViewerNormalize;
use crate::viewer::scene::ViewerSource;
use crate::viewer::source::{ResolvedSource, default_download_dir};
use crate::viewer::types::{DownloadInbox, ModelLoad};

/// Showroom backdrop
const BACKGROUND: Color = Color::srgb(0.96, 0.96, 0.95);

#[derive(Parser, Debug)]
#[command(name = "luxe-viewer")]
#[command(about = "3D asset viewer for Luxe Archive")]
pub struct ViewerArgs {
    /// Path or http(s) URL of the .glb/.gltf file
    pub source: String,

    /// Window title (defaults to the file name)
    #[arg(long)]
    pub title: Option<String>,
}

/// Systems and resources of the viewer scene
pub struct ViewerPlugin {
    pub source: ResolvedSource,
    pub settings: NormalizeSettings,
}

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(BACKGROUND))
            .insert_resource(ViewerSource(self.source.clone()))
            .insert_resource(ViewerNormalize(self.settings))
            .init_resource::<ModelLoad>()
            .init_resource::<DownloadInbox>()
            .add_systems(
                Startup,
                (scene::setup_scene, ui::setup_ui, scene::start_loading),
            )
            .add_systems(
                Update,
                (
                    (
                        scene::poll_download,
                        scene::spawn_loaded_model,
                        normalize::normalize_spawned_model,
                    )
                        .chain(),
                    ui::update_loading_indicator,
                    ui::show_error_panel,
                    camera::apply_camera_preset,
                    camera::orbit_camera.after(camera::apply_camera_preset),
                    scene::idle_motion,
                ),
            );
    }
}

/// Open the viewer window and block until it is closed
pub fn run(args: ViewerArgs) {
    let source = ResolvedSource::resolve(&args.source, &default_download_dir());
    let title = args
        .title
        .unwrap_or_else(|| format!("Luxe Archive: {}", source.display_name()));
    let settings = NormalizeSettings::from_config(&VaultConfig::load());

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title,
                        resolution: WindowResolution::new(960, 720),
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: source.asset_dir.to_string_lossy().to_string(),
                    ..default()
                }),
        )
        .add_plugins(ViewerPlugin { source, settings })
        .run();
}
