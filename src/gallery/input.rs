use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::{Direction, NavigationRequest, NoteOverlay, PointerInput};
use crate::story::AppPhase;

/// Turns raw mouse, touch and keyboard input into gallery events.
pub struct GalleryInputPlugin;

impl Plugin for GalleryInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PreUpdate,
            (collect_mouse_input, collect_touch_input, keyboard_navigation)
                .after(bevy::input::InputSystem)
                .run_if(in_state(AppPhase::Gallery)),
        )
        .add_systems(Update, close_note_on_escape);
    }
}

fn collect_mouse_input(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut pointer: EventWriter<PointerInput>,
    mut last_cursor: Local<Option<Vec2>>,
) {
    let cursor = windows
        .single()
        .ok()
        .and_then(|window| window.cursor_position());

    if buttons.just_pressed(MouseButton::Left) {
        if let Some(position) = cursor {
            pointer.write(PointerInput::Down(position));
        }
    } else if buttons.pressed(MouseButton::Left) {
        if let Some(position) = cursor.filter(|position| Some(*position) != *last_cursor) {
            pointer.write(PointerInput::Move(position));
        }
    }

    if buttons.just_released(MouseButton::Left) {
        pointer.write(PointerInput::Up);
    }
    *last_cursor = cursor;
}

/// Follows the first finger down until it lifts; other fingers are ignored.
fn collect_touch_input(
    touches: Res<Touches>,
    mut pointer: EventWriter<PointerInput>,
    mut tracked: Local<Option<u64>>,
) {
    if tracked.is_none() {
        if let Some(touch) = touches.iter_just_pressed().next() {
            *tracked = Some(touch.id());
            pointer.write(PointerInput::Down(touch.position()));
        }
    }

    let Some(id) = *tracked else {
        return;
    };

    if let Some(touch) = touches.get_pressed(id) {
        if touch.delta() != Vec2::ZERO {
            pointer.write(PointerInput::Move(touch.position()));
        }
    } else if touches.just_released(id) || touches.just_canceled(id) {
        *tracked = None;
        pointer.write(PointerInput::Up);
    }
}

fn keyboard_navigation(
    keys: Res<ButtonInput<KeyCode>>,
    overlay: Res<NoteOverlay>,
    mut requests: EventWriter<NavigationRequest>,
) {
    if overlay.is_open() {
        return;
    }
    if keys.just_pressed(KeyCode::ArrowRight) {
        requests.write(NavigationRequest::Advance(Direction::Forward));
    }
    if keys.just_pressed(KeyCode::ArrowLeft) {
        requests.write(NavigationRequest::Advance(Direction::Backward));
    }
}

fn close_note_on_escape(keys: Res<ButtonInput<KeyCode>>, mut overlay: ResMut<NoteOverlay>) {
    if keys.just_pressed(KeyCode::Escape) && overlay.is_open() {
        overlay.close();
    }
}
