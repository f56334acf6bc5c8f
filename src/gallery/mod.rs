pub mod carousel;
pub mod input;
pub mod refresh;

use std::time::Duration;

use bevy::prelude::*;

use crate::config::GreetingConfig;
use crate::schedule::{Scheduler, TaskHandle};
use crate::story::AppPhase;
pub use carousel::{
    Carousel, CarouselError, Direction, DragFeedback, GestureOutcome, GestureTuning, Navigation,
};
pub use refresh::{CardPose, DisplayRefresh, EntranceAnimation, RefreshPhase, RefreshStep};

/// Index changes requested from outside the gesture handlers (timeline, keys)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationRequest {
    Advance(Direction),
    JumpTo(usize),
}

/// The carousel index moved. The display refresh starts from this event only.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoNavigated(pub Navigation);

/// A photo was swapped onto the card. Decorations subscribe to this.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoChanged {
    pub index: usize,
    pub photo_count: usize,
    pub animation: EntranceAnimation,
}

/// Pointer or touch input over the window, in logical pixels (origin top-left)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down(Vec2),
    Move(Vec2),
    Up,
}

/// An accepted tap on the photo card
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct GalleryTapped {
    pub position: Vec2,
}

/// Screen rectangle of the photo card, written by the UI every frame
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct GalleryBounds(pub Option<Rect>);

/// Drag emphasis for the card while a gesture is in progress
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct DragVisual(pub Option<DragFeedback>);

/// The love note shown when the card is tapped
#[derive(Resource, Debug)]
pub struct NoteOverlay {
    open: Option<String>,
    reveal_delay: Duration,
    reveal: Scheduler<String>,
    pending: Option<TaskHandle>,
}

impl NoteOverlay {
    pub fn new(reveal_delay: Duration) -> Self {
        Self {
            open: None,
            reveal_delay,
            reveal: Scheduler::new(),
            pending: None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.open.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Schedules the note to open, replacing any reveal still pending.
    pub fn schedule(&mut self, note: String) {
        if let Some(handle) = self.pending.take() {
            self.reveal.cancel(handle);
        }
        self.pending = Some(self.reveal.schedule(self.reveal_delay, note));
    }

    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(note) = self.reveal.advance(delta).pop() else {
            return false;
        };
        self.pending = None;
        self.open = Some(note);
        true
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn teardown(&mut self) {
        self.reveal.cancel_all();
        self.pending = None;
        self.open = None;
    }
}

pub struct GalleryPlugin;

impl Plugin for GalleryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GalleryBounds>()
            .init_resource::<DragVisual>()
            .add_event::<NavigationRequest>()
            .add_event::<PhotoNavigated>()
            .add_event::<PhotoChanged>()
            .add_event::<PointerInput>()
            .add_event::<GalleryTapped>()
            .add_systems(OnEnter(AppPhase::Gallery), show_first_photo)
            .add_systems(
                Update,
                (
                    apply_pointer_input.run_if(note_closed),
                    apply_navigation_requests,
                    start_refresh,
                    drive_refresh,
                    schedule_note_reveal,
                    drive_note_overlay,
                )
                    .chain()
                    .run_if(in_state(AppPhase::Gallery)),
            )
            .add_systems(Last, teardown_on_exit);
    }
}

fn note_closed(overlay: Res<NoteOverlay>) -> bool {
    !overlay.is_open()
}

fn show_first_photo(carousel: Res<Carousel>, mut refresh: ResMut<DisplayRefresh>) {
    info!(
        "Gallery opened on photo {} of {}",
        carousel.current_index() + 1,
        carousel.photo_count()
    );
    refresh.request(carousel.current_index());
}

fn apply_pointer_input(
    time: Res<Time>,
    bounds: Res<GalleryBounds>,
    mut pointer: EventReader<PointerInput>,
    mut carousel: ResMut<Carousel>,
    mut drag_visual: ResMut<DragVisual>,
    mut navigated: EventWriter<PhotoNavigated>,
    mut tapped: EventWriter<GalleryTapped>,
    mut last_position: Local<Vec2>,
) {
    let now = time.elapsed();
    for input in pointer.read() {
        match *input {
            PointerInput::Down(position) => {
                let inside = bounds.0.is_some_and(|rect| rect.contains(position));
                if inside {
                    carousel.press(position.x, now);
                    *last_position = position;
                }
            }
            PointerInput::Move(position) => {
                if let Some(feedback) = carousel.drag(position.x) {
                    drag_visual.0 = Some(feedback);
                    *last_position = position;
                }
            }
            PointerInput::Up => {
                drag_visual.0 = None;
                match carousel.release(now) {
                    Some(GestureOutcome::Navigated(navigation)) => {
                        debug!("Swiped from photo {} to {}", navigation.from, navigation.to);
                        navigated.write(PhotoNavigated(navigation));
                    }
                    Some(GestureOutcome::Tap) => {
                        tapped.write(GalleryTapped {
                            position: *last_position,
                        });
                    }
                    Some(GestureOutcome::TapSuppressed) => debug!("Tap suppressed by debounce"),
                    None => {}
                }
            }
        }
    }
}

fn apply_navigation_requests(
    mut requests: EventReader<NavigationRequest>,
    mut carousel: ResMut<Carousel>,
    mut navigated: EventWriter<PhotoNavigated>,
) {
    for request in requests.read() {
        let navigation = match *request {
            NavigationRequest::Advance(direction) => Some(carousel.advance(direction)),
            NavigationRequest::JumpTo(index) => match carousel.jump_to(index) {
                Ok(navigation) => navigation,
                Err(err) => {
                    warn!("Ignoring navigation request: {}", err);
                    None
                }
            },
        };
        if let Some(navigation) = navigation {
            navigated.write(PhotoNavigated(navigation));
        }
    }
}

fn start_refresh(mut navigated: EventReader<PhotoNavigated>, mut refresh: ResMut<DisplayRefresh>) {
    for PhotoNavigated(navigation) in navigated.read() {
        refresh.request(navigation.to);
    }
}

fn drive_refresh(
    time: Res<Time>,
    carousel: Res<Carousel>,
    mut refresh: ResMut<DisplayRefresh>,
    mut changed: EventWriter<PhotoChanged>,
) {
    for step in refresh.advance(time.delta()) {
        if let RefreshStep::Swap { index, animation } = step {
            changed.write(PhotoChanged {
                index,
                photo_count: carousel.photo_count(),
                animation,
            });
        }
    }
}

fn schedule_note_reveal(
    mut tapped: EventReader<GalleryTapped>,
    carousel: Res<Carousel>,
    config: Res<GreetingConfig>,
    mut overlay: ResMut<NoteOverlay>,
) {
    for _ in tapped.read() {
        if let Some(photo) = config.photos.get(carousel.current_index()) {
            overlay.schedule(photo.note.clone());
        }
    }
}

/// Pointer input is not read while the note is open, so a gesture still in
/// flight when it opens would never see its release. Drop it here.
fn drive_note_overlay(
    time: Res<Time>,
    mut overlay: ResMut<NoteOverlay>,
    mut carousel: ResMut<Carousel>,
    mut drag_visual: ResMut<DragVisual>,
) {
    if overlay.tick(time.delta()) {
        carousel.cancel_gesture();
        drag_visual.0 = None;
        debug!("Love note opened");
    }
}

fn teardown_on_exit(
    mut exit: EventReader<AppExit>,
    mut refresh: ResMut<DisplayRefresh>,
    mut overlay: ResMut<NoteOverlay>,
) {
    if exit.read().next().is_none() {
        return;
    }
    let cancelled = refresh.teardown();
    overlay.teardown();
    info!("Gallery torn down, {} pending refresh task(s) cancelled", cancelled);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_tap_replaces_pending_reveal() {
        let mut overlay = NoteOverlay::new(Duration::from_millis(100));
        overlay.schedule("first".into());
        assert!(!overlay.tick(Duration::from_millis(60)));
        overlay.schedule("second".into());
        assert!(!overlay.tick(Duration::from_millis(60)));
        assert!(overlay.tick(Duration::from_millis(40)));
        assert_eq!(overlay.text(), Some("second"));

        overlay.close();
        assert!(!overlay.is_open());
        assert!(!overlay.tick(Duration::from_secs(1)));
    }

    #[test]
    fn teardown_drops_pending_reveal() {
        let mut overlay = NoteOverlay::new(Duration::from_millis(100));
        overlay.schedule("note".into());
        overlay.teardown();
        assert!(!overlay.tick(Duration::from_secs(1)));
        assert_eq!(overlay.text(), None);
    }
}
