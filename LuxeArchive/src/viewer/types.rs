//! Resources and components for the asset viewer

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use bevy::gltf::Gltf;
use bevy::prelude::*;

/// Distance limits of the orbit camera
pub const MIN_DISTANCE: f32 = 3.0;
pub const MAX_DISTANCE: f32 = 12.0;

/// Fraction of the remaining distance covered per 60 fps frame
pub const DAMPING_FACTOR: f32 = 0.08;

/// Where the model comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// File on disk, loaded straight from its directory
    Local(PathBuf),
    /// http(s) URL, downloaded to a temp file first
    Remote(String),
}

/// Load state of the displayed asset
#[derive(Resource, Debug, Clone, PartialEq, Default)]
pub enum ModelLoad {
    /// Waiting for a remote download
    #[default]
    Fetching,
    /// File handed to the asset server
    Loading(Handle<Gltf>),
    /// Scene spawned, waiting for its meshes to normalize
    Spawned,
    /// Normalized and on screen
    Ready,
    /// Download or parse failed
    Failed(String),
}

impl ModelLoad {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Fetching | Self::Loading(_) | Self::Spawned)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Outcome of the background download, picked up by `poll_download`
#[derive(Resource, Clone, Default)]
pub struct DownloadInbox(pub Arc<Mutex<Option<Result<String, String>>>>);

/// Orbit camera component with damped motion
#[derive(Component, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
    pub target_yaw: f32,
    pub target_pitch: f32,
    pub target_radius: f32,
}

impl OrbitCamera {
    /// Camera on the +Z axis looking at the origin
    pub fn new(radius: f32) -> Self {
        let radius = radius.clamp(MIN_DISTANCE, MAX_DISTANCE);
        Self {
            yaw: 0.0,
            pitch: 0.0,
            radius,
            target_yaw: 0.0,
            target_pitch: 0.0,
            target_radius: radius,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(
            self.radius * self.pitch.cos() * self.yaw.sin(),
            self.radius * self.pitch.sin(),
            self.radius * self.pitch.cos() * self.yaw.cos(),
        )
    }
}

/// Preset applied to the camera for the current window shape
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CameraPreset {
    pub fov_degrees: f32,
    pub distance: f32,
}

impl CameraPreset {
    pub const PORTRAIT: Self = Self {
        fov_degrees: 45.0,
        distance: 6.0,
    };

    pub const LANDSCAPE: Self = Self {
        fov_degrees: 28.0,
        distance: 4.8,
    };

    pub fn for_aspect(aspect: f32) -> Self {
        if aspect < 1.0 {
            Self::PORTRAIT
        } else {
            Self::LANDSCAPE
        }
    }
}

/// Parent of the model; carries the idle spin and bob
#[derive(Component)]
pub struct IdleMotion;

/// Entity holding the glTF scene; carries the normalization transform
#[derive(Component)]
pub struct ModelRoot;

/// Contact-shadow disc under the model
#[derive(Component)]
pub struct GroundShadow;

/// "Streaming..." overlay
#[derive(Component)]
pub struct LoadingIndicator;

/// Static panel shown in place of a failed model
#[derive(Component)]
pub struct ErrorPanel;
