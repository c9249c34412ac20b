//! Overlays for the loading and failed states

use bevy::prelude::*;

use crate::viewer::types::{ErrorPanel, LoadingIndicator, ModelLoad, ModelRoot};

pub const LOADING_TEXT: &str = "Streaming...";
pub const ERROR_TITLE: &str = "Sync Error";
pub const ERROR_DETAIL: &str = "Spatial packet lost.\nArchive connection failed.";

const MUTED: Color = Color::srgba(0.0, 0.0, 0.0, 0.3);

/// Spawn the centered "Streaming..." label
pub fn setup_ui(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            LoadingIndicator,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(LOADING_TEXT),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(MUTED),
            ));
        });
}

/// Show the loading label only while the model is on its way
pub fn update_loading_indicator(
    load: Res<ModelLoad>,
    mut query: Query<&mut Visibility, With<LoadingIndicator>>,
) {
    if !load.is_changed() {
        return;
    }
    let visibility = if load.is_pending() {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut vis in &mut query {
        *vis = visibility;
    }
}

/// Replace the model with the error panel when loading fails
pub fn show_error_panel(
    mut commands: Commands,
    load: Res<ModelLoad>,
    roots: Query<Entity, With<ModelRoot>>,
    panels: Query<(), With<ErrorPanel>>,
) {
    let ModelLoad::Failed(reason) = &*load else {
        return;
    };
    if !load.is_changed() {
        return;
    }
    for root in &roots {
        commands.entity(root).despawn();
    }
    if !panels.is_empty() {
        return;
    }

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            ErrorPanel,
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        padding: UiRect::all(Val::Px(32.0)),
                        row_gap: Val::Px(12.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.85)),
                    BorderRadius::all(Val::Px(24.0)),
                ))
                .with_children(|card| {
                    card.spawn((
                        Text::new(ERROR_TITLE),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(Color::BLACK),
                    ));
                    card.spawn((
                        Text::new(ERROR_DETAIL),
                        TextFont {
                            font_size: 11.0,
                            ..default()
                        },
                        TextColor(MUTED),
                    ));
                    card.spawn((
                        Text::new(reason.clone()),
                        TextFont {
                            font_size: 9.0,
                            ..default()
                        },
                        TextColor(MUTED),
                    ));
                });
        });
}
