//! Camera controls and systems

use std::f32::consts::PI;

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::viewer::types::{CameraPreset, DAMPING_FACTOR, MAX_DISTANCE, MIN_DISTANCE, OrbitCamera};

const ROTATE_SPEED: f32 = 0.005;
const ZOOM_SPEED: f32 = 0.5;

/// Interpolation weight for one frame of `dt` seconds, scaled so a 60 fps
/// frame covers exactly `factor` of the remaining distance
pub fn damping_step(factor: f32, dt: f32) -> f32 {
    1.0 - (1.0 - factor).powf(dt * 60.0)
}

/// Switch between the portrait and landscape presets when the window shape changes
pub fn apply_camera_preset(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut cameras: Query<(&mut Projection, &mut CameraPreset, &mut OrbitCamera, &mut Transform)>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let (width, height) = (window.width(), window.height());
    if width <= 0.0 || height <= 0.0 {
        return; // minimized
    }
    let wanted = CameraPreset::for_aspect(width / height);

    for (mut projection, mut preset, mut orbit, mut transform) in &mut cameras {
        if *preset == wanted && matches!(*projection, Projection::Perspective(_)) {
            continue;
        }
        *projection = Projection::Perspective(PerspectiveProjection {
            fov: wanted.fov_degrees.to_radians(),
            ..default()
        });
        *preset = wanted;

        // Jump rather than ease to the new distance
        orbit.radius = wanted.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
        orbit.target_radius = orbit.radius;
        transform.translation = orbit.position();
        transform.look_at(Vec3::ZERO, Vec3::Y);
    }
}

/// Rotate with left drag, zoom with the scroll wheel. No panning.
pub fn orbit_camera(
    time: Res<Time>,
    accumulated_mouse_motion: Res<AccumulatedMouseMotion>,
    accumulated_mouse_scroll: Res<AccumulatedMouseScroll>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut query: Query<(&mut Transform, &mut OrbitCamera)>,
) {
    let mut rotation_delta = Vec2::ZERO;
    if mouse_buttons.pressed(MouseButton::Left) {
        rotation_delta = accumulated_mouse_motion.delta;
    }
    let zoom_delta = -accumulated_mouse_scroll.delta.y * ZOOM_SPEED;
    let step = damping_step(DAMPING_FACTOR, time.delta_secs());

    for (mut transform, mut orbit) in &mut query {
        orbit.target_yaw -= rotation_delta.x * ROTATE_SPEED;
        orbit.target_pitch = (orbit.target_pitch - rotation_delta.y * ROTATE_SPEED)
            .clamp(-PI / 2.0 + 0.1, PI / 2.0 - 0.1);
        orbit.target_radius = (orbit.target_radius + zoom_delta).clamp(MIN_DISTANCE, MAX_DISTANCE);

        orbit.yaw += (orbit.target_yaw - orbit.yaw) * step;
        orbit.pitch += (orbit.target_pitch - orbit.pitch) * step;
        orbit.radius += (orbit.target_radius - orbit.radius) * step;

        transform.translation = orbit.position();
        transform.look_at(Vec3::ZERO, Vec3::Y);
    }
}
