//! Scene setup, model loading, and idle motion

use std::f32::consts::FRAC_PI_2;

use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::light::NotShadowCaster;
use bevy::prelude::*;

use crate::viewer::source::{ResolvedSource, check_local_model, spawn_download};
use crate::viewer::types::{
    CameraPreset, DownloadInbox, GroundShadow, IdleMotion, ModelLoad, ModelRoot, ModelSource,
    OrbitCamera,
};

/// Model location handed over from the command line
#[derive(Resource)]
pub struct ViewerSource(pub ResolvedSource);

// Light rig positions and strengths
const AMBIENT_BRIGHTNESS: f32 = 0.8 * 400.0;
const KEY_POSITION: Vec3 = Vec3::new(15.0, 25.0, 10.0);
const KEY_INTENSITY: f32 = 3.0 * 2_000_000.0;
const KEY_CONE: f32 = 0.2;
const FILL_POSITION: Vec3 = Vec3::new(-10.0, 10.0, 5.0);
const FILL_ILLUMINANCE: f32 = 1.5 * 2_000.0;
const RIM_POSITION: Vec3 = Vec3::new(0.0, -10.0, -5.0);
const RIM_INTENSITY: f32 = 400_000.0;

// Contact shadow disc
const GROUND_HEIGHT: f32 = -1.8;
const GROUND_RADIUS: f32 = 7.5;
const GROUND_OPACITY: f32 = 0.3;

// Idle motion
const IDLE_YAW_PER_FRAME: f32 = 0.002;
const BOB_SPEED: f32 = 0.3;
const BOB_HEIGHT: f32 = 0.05;

/// Yaw advance for a frame of `dt` seconds
pub fn idle_yaw_step(dt: f32) -> f32 {
    IDLE_YAW_PER_FRAME * dt * 60.0
}

/// Vertical offset at `elapsed` seconds
pub fn bob_offset(elapsed: f32) -> f32 {
    (elapsed * BOB_SPEED).sin() * BOB_HEIGHT
}

/// Camera, light rig, ground disc, and the (empty) model pivot
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Preset is corrected on the first frame from the real window size
    let preset = CameraPreset::LANDSCAPE;
    let orbit = OrbitCamera::new(preset.distance);
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: preset.fov_degrees.to_radians(),
            ..default()
        }),
        Transform::from_translation(orbit.position()).looking_at(Vec3::ZERO, Vec3::Y),
        preset,
        orbit,
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    });

    // Key
    commands.spawn((
        SpotLight {
            intensity: KEY_INTENSITY,
            range: 80.0,
            inner_angle: 0.0,
            outer_angle: KEY_CONE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(KEY_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Fill
    commands.spawn((
        DirectionalLight {
            illuminance: FILL_ILLUMINANCE,
            color: Color::WHITE,
            ..default()
        },
        Transform::from_translation(FILL_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Rim
    commands.spawn((
        PointLight {
            intensity: RIM_INTENSITY,
            range: 30.0,
            color: Color::WHITE,
            ..default()
        },
        Transform::from_translation(RIM_POSITION),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Circle::new(GROUND_RADIUS))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.85, 0.85, 0.85, GROUND_OPACITY),
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_xyz(0.0, GROUND_HEIGHT, 0.0).with_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
        NotShadowCaster,
        GroundShadow,
    ));

    commands.spawn((Transform::default(), Visibility::default(), IdleMotion));
}

/// Load local files right away, start the download for remote ones
pub fn start_loading(
    source: Res<ViewerSource>,
    inbox: Res<DownloadInbox>,
    asset_server: Res<AssetServer>,
    mut load: ResMut<ModelLoad>,
) {
    match &source.0.source {
        ModelSource::Local(path) => {
            info!("Loading {}", path.display());
            *load = match check_local_model(path) {
                Ok(()) => ModelLoad::Loading(asset_server.load(source.0.file_name.clone())),
                Err(reason) => {
                    warn!("Model cannot be displayed: {}", reason);
                    ModelLoad::Failed(reason)
                }
            };
        }
        ModelSource::Remote(url) => {
            info!("Fetching {}", url);
            spawn_download(url.clone(), source.0.download_path(), inbox.0.clone());
        }
    }
}

/// Hand a finished download to the asset server
pub fn poll_download(
    inbox: Res<DownloadInbox>,
    asset_server: Res<AssetServer>,
    mut load: ResMut<ModelLoad>,
) {
    if *load != ModelLoad::Fetching {
        return;
    }
    let Some(outcome) = inbox.0.lock().ok().and_then(|mut slot| slot.take()) else {
        return;
    };
    *load = match outcome {
        Ok(file_name) => ModelLoad::Loading(asset_server.load(file_name)),
        Err(e) => ModelLoad::Failed(e),
    };
}

/// Spawn the scene under the pivot once the glTF asset is loaded
pub fn spawn_loaded_model(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
    pivots: Query<Entity, With<IdleMotion>>,
    mut load: ResMut<ModelLoad>,
) {
    let ModelLoad::Loading(handle) = &*load else {
        return;
    };

    let next = match asset_server.load_state(handle.id()) {
        LoadState::Loaded => {
            let scene = gltfs
                .get(handle)
                .and_then(|gltf| gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned()));
            match (scene, pivots.single()) {
                (Some(scene), Ok(pivot)) => {
                    commands.entity(pivot).with_children(|parent| {
                        parent.spawn((SceneRoot(scene), Transform::default(), ModelRoot));
                    });
                    ModelLoad::Spawned
                }
                (None, _) => ModelLoad::Failed("file contains no scene".to_string()),
                (_, Err(e)) => ModelLoad::Failed(e.to_string()),
            }
        }
        LoadState::Failed(e) => ModelLoad::Failed(e.to_string()),
        LoadState::NotLoaded | LoadState::Loading => return,
    };

    if let ModelLoad::Failed(reason) = &next {
        warn!("Model failed to load: {}", reason);
    }
    *load = next;
}

/// Slow spin and bob of the mounted model
pub fn idle_motion(time: Res<Time>, load: Res<ModelLoad>, mut query: Query<&mut Transform, With<IdleMotion>>) {
    if *load != ModelLoad::Ready {
        return;
    }
    let yaw = idle_yaw_step(time.delta_secs());
    let bob = bob_offset(time.elapsed_secs());

    for mut transform in &mut query {
        transform.rotate_y(yaw);
        transform.translation.y = bob;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_yaw_matches_per_frame_rate() {
        assert!((idle_yaw_step(1.0 / 60.0) - 0.002).abs() < 1e-7);
        assert!((idle_yaw_step(1.0 / 30.0) - 0.004).abs() < 1e-7);
    }

    #[test]
    fn test_bob_stays_within_height() {
        assert!(bob_offset(0.0).abs() < 1e-7);
        for step in 0..200 {
            assert!(bob_offset(step as f32 * 0.37).abs() <= BOB_HEIGHT + 1e-6);
        }
        let peak = std::f32::consts::FRAC_PI_2 / BOB_SPEED;
        assert!((bob_offset(peak) - BOB_HEIGHT).abs() < 1e-6);
    }
}
