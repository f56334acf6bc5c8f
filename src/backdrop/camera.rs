use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::constants::FALLBACK_VIEWPORT;

#[derive(Component)]
pub struct BackdropCamera;

pub fn spawn_backdrop_camera(mut commands: Commands, existing: Query<(), With<BackdropCamera>>) {
    if !existing.is_empty() {
        return;
    }

    commands.spawn((Camera2d, BackdropCamera));
    info!("Spawned backdrop camera");
}

/// Logical size of the primary window, or a fixed fallback when there is none.
pub fn viewport_size(windows: &Query<&Window, With<PrimaryWindow>>) -> Vec2 {
    windows
        .single()
        .map(|window| Vec2::new(window.width(), window.height()))
        .unwrap_or(Vec2::from(FALLBACK_VIEWPORT))
}

/// Field coordinates are screen space (origin top-left, y down); the 2D camera
/// looks at the window centre with y up.
pub fn field_to_world(position: Vec2, bounds: Vec2) -> Vec2 {
    Vec2::new(position.x - bounds.x * 0.5, bounds.y * 0.5 - position.y)
}
