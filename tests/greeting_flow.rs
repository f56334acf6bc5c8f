use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use monthsary::effects::{DecorKind, Decoration, LoveMeter, Timeline};
use monthsary::gallery::{
    Direction, DragVisual, GalleryBounds, NavigationRequest, PointerInput, RefreshPhase,
};
use monthsary::story::StoryCommand;
use monthsary::{install, AppPhase, Carousel, ConfigError, DisplayRefresh, GreetingConfig};
use monthsary::{NoteOverlay, StoryState};

const FRAME: Duration = Duration::from_millis(50);

fn greeting_app(config: GreetingConfig) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    install(&mut app, config).expect("default greeting installs");
    app.update();
    app
}

fn run_for(app: &mut App, duration: Duration) {
    let frames = duration.as_millis().div_ceil(FRAME.as_millis()) + 1;
    for _ in 0..frames {
        app.update();
    }
}

/// Enters the gallery and waits for the first photo to settle.
fn gallery_app() -> App {
    let mut app = greeting_app(GreetingConfig::default());
    app.world_mut().send_event(StoryCommand::EnterGallery);
    run_for(&mut app, Duration::from_millis(2000));
    app.world_mut().resource_mut::<GalleryBounds>().0 =
        Some(Rect::new(100.0, 100.0, 500.0, 600.0));
    app
}

fn decorations(app: &mut App, matches: impl Fn(&DecorKind) -> bool) -> usize {
    let mut query = app.world_mut().query::<&Decoration>();
    query
        .iter(app.world())
        .filter(|decoration| matches(&decoration.kind))
        .count()
}

fn phase(app: &App) -> AppPhase {
    *app.world().resource::<State<AppPhase>>().get()
}

#[test]
fn story_leads_into_gallery() {
    let mut app = greeting_app(GreetingConfig::default());
    assert_eq!(phase(&app), AppPhase::Story);

    app.world_mut().send_event(StoryCommand::Next);
    app.update();
    assert_eq!(app.world().resource::<StoryState>().current(), 2);

    app.world_mut().send_event(StoryCommand::EnterGallery);
    run_for(&mut app, Duration::from_millis(400));
    assert_eq!(phase(&app), AppPhase::Gallery);

    let refresh = app.world().resource::<DisplayRefresh>();
    assert_eq!(refresh.displayed(), Some(0));
    assert!(!app.world().resource::<LoveMeter>().is_visible());
}

#[test]
fn story_completion_throws_confetti() {
    let mut app = greeting_app(GreetingConfig::default());
    let total = app.world().resource::<StoryState>().total();
    for _ in 1..total {
        app.world_mut().send_event(StoryCommand::Next);
        app.update();
    }
    assert_eq!(decorations(&mut app, |kind| matches!(kind, DecorKind::Dot(_))), 0);

    run_for(&mut app, Duration::from_millis(2100));
    assert!(app.world().resource::<StoryState>().completion_open());
    assert!(decorations(&mut app, |kind| matches!(kind, DecorKind::Dot(_))) > 0);
}

#[test]
fn backward_from_first_photo_wraps_to_last() {
    let mut app = gallery_app();
    let last = app.world().resource::<Carousel>().photo_count() - 1;

    app.world_mut()
        .send_event(NavigationRequest::Advance(Direction::Backward));
    run_for(&mut app, Duration::from_millis(400));

    assert_eq!(app.world().resource::<Carousel>().current_index(), last);
    assert_eq!(app.world().resource::<DisplayRefresh>().displayed(), Some(last));
    assert_eq!(app.world().resource::<Timeline>().highlighted(), last);

    let meter = app.world().resource::<LoveMeter>();
    assert!(meter.is_visible());
    assert_eq!(meter.reading().progress, 100.0);
}

#[test]
fn reaching_the_last_photo_shows_the_banner() {
    let mut app = gallery_app();
    let last = app.world().resource::<Carousel>().photo_count() - 1;

    app.world_mut().send_event(NavigationRequest::JumpTo(last));
    // Banner appears after the celebration delay
    run_for(&mut app, Duration::from_millis(400));
    assert_eq!(
        decorations(&mut app, |kind| matches!(kind, DecorKind::Banner(_))),
        1
    );
}

#[test]
fn swipe_left_moves_forward() {
    let mut app = gallery_app();

    app.world_mut().send_event(PointerInput::Down(Vec2::new(400.0, 300.0)));
    app.update();
    app.world_mut().send_event(PointerInput::Move(Vec2::new(300.0, 300.0)));
    app.update();
    assert!(app.world().resource::<Carousel>().is_dragging());
    app.world_mut().send_event(PointerInput::Up);
    app.update();

    assert_eq!(app.world().resource::<Carousel>().current_index(), 1);
    run_for(&mut app, Duration::from_millis(400));
    assert_eq!(app.world().resource::<DisplayRefresh>().displayed(), Some(1));
}

#[test]
fn short_drag_counts_as_a_tap() {
    let mut app = gallery_app();
    let note = GreetingConfig::default().photos[0].note.clone();

    app.world_mut().send_event(PointerInput::Down(Vec2::new(400.0, 300.0)));
    app.world_mut().send_event(PointerInput::Move(Vec2::new(370.0, 300.0)));
    app.world_mut().send_event(PointerInput::Up);
    run_for(&mut app, Duration::from_millis(300));

    assert_eq!(app.world().resource::<Carousel>().current_index(), 0);
    assert_eq!(
        app.world().resource::<NoteOverlay>().text(),
        Some(note.as_str())
    );
}

#[test]
fn gesture_pending_when_note_opens_is_dropped() {
    let mut app = gallery_app();

    app.world_mut().send_event(PointerInput::Down(Vec2::new(300.0, 300.0)));
    app.world_mut().send_event(PointerInput::Up);
    app.update();

    // Pressed again before the note has revealed; it opens this frame
    app.world_mut().send_event(PointerInput::Down(Vec2::new(300.0, 300.0)));
    app.update();
    assert!(app.world().resource::<NoteOverlay>().is_open());
    assert!(!app.world().resource::<Carousel>().is_dragging());
    assert!(app.world().resource::<DragVisual>().0.is_none());

    // Released while the note is open, then the note is closed
    app.world_mut().send_event(PointerInput::Up);
    app.update();
    app.world_mut().resource_mut::<NoteOverlay>().close();
    app.update();

    // A tap in place somewhere else on the card must not read as a swipe
    app.world_mut().send_event(PointerInput::Down(Vec2::new(220.0, 300.0)));
    app.world_mut().send_event(PointerInput::Move(Vec2::new(220.0, 300.0)));
    app.world_mut().send_event(PointerInput::Up);
    run_for(&mut app, Duration::from_millis(400));

    assert_eq!(app.world().resource::<Carousel>().current_index(), 0);
    assert_eq!(app.world().resource::<DisplayRefresh>().displayed(), Some(0));
    assert!(!app.world().resource::<Carousel>().is_dragging());
}

#[test]
fn press_outside_the_card_is_ignored() {
    let mut app = gallery_app();

    app.world_mut().send_event(PointerInput::Down(Vec2::new(900.0, 300.0)));
    app.world_mut().send_event(PointerInput::Move(Vec2::new(700.0, 300.0)));
    app.world_mut().send_event(PointerInput::Up);
    app.update();

    assert!(!app.world().resource::<Carousel>().is_dragging());
    assert_eq!(app.world().resource::<Carousel>().current_index(), 0);
}

#[test]
fn tap_reveals_the_photo_note() {
    let mut app = gallery_app();
    let note = GreetingConfig::default().photos[0].note.clone();

    app.world_mut().send_event(PointerInput::Down(Vec2::new(300.0, 300.0)));
    app.world_mut().send_event(PointerInput::Up);
    app.update();
    assert!(!app.world().resource::<NoteOverlay>().is_open());
    assert!(decorations(&mut app, |kind| matches!(kind, DecorKind::Glyph(g) if g == "✨")) > 0);

    run_for(&mut app, Duration::from_millis(150));
    assert_eq!(
        app.world().resource::<NoteOverlay>().text(),
        Some(note.as_str())
    );

    // Input is blocked while the note is open
    app.world_mut().send_event(PointerInput::Down(Vec2::new(400.0, 300.0)));
    app.world_mut().send_event(PointerInput::Move(Vec2::new(200.0, 300.0)));
    app.world_mut().send_event(PointerInput::Up);
    app.update();
    assert_eq!(app.world().resource::<Carousel>().current_index(), 0);
}

#[test]
fn rapid_requests_refresh_once() {
    let mut app = gallery_app();
    let toasts = |app: &mut App| decorations(app, |kind| matches!(kind, DecorKind::Toast(_)));
    let before = toasts(&mut app);

    for _ in 0..3 {
        app.world_mut()
            .send_event(NavigationRequest::Advance(Direction::Forward));
    }
    run_for(&mut app, Duration::from_millis(400));

    assert_eq!(app.world().resource::<Carousel>().current_index(), 3);
    assert_eq!(app.world().resource::<DisplayRefresh>().displayed(), Some(3));
    assert_eq!(toasts(&mut app), before + 1);
}

#[test]
fn jump_to_current_photo_does_nothing() {
    let mut app = gallery_app();
    let toasts = |app: &mut App| decorations(app, |kind| matches!(kind, DecorKind::Toast(_)));
    let before = toasts(&mut app);

    app.world_mut().send_event(NavigationRequest::JumpTo(0));
    app.world_mut().send_event(NavigationRequest::JumpTo(99));
    app.update();

    assert_eq!(
        app.world().resource::<DisplayRefresh>().phase(),
        RefreshPhase::Idle
    );
    run_for(&mut app, Duration::from_millis(400));
    assert_eq!(toasts(&mut app), before);
}

#[test]
fn exit_tears_down_pending_work() {
    let mut app = gallery_app();

    app.world_mut()
        .send_event(NavigationRequest::Advance(Direction::Forward));
    app.world_mut().send_event(PointerInput::Down(Vec2::new(300.0, 300.0)));
    app.world_mut().send_event(PointerInput::Up);
    app.update();
    assert!(app.world().resource::<DisplayRefresh>().is_busy());

    app.world_mut().send_event(AppExit::Success);
    app.update();
    assert!(!app.world().resource::<DisplayRefresh>().is_busy());

    run_for(&mut app, Duration::from_millis(400));
    assert!(!app.world().resource::<NoteOverlay>().is_open());
    assert_eq!(app.world().resource::<DisplayRefresh>().displayed(), Some(0));
}

#[test]
fn empty_gallery_is_rejected() {
    let mut app = App::new();
    let config = GreetingConfig {
        photos: Vec::new(),
        ..GreetingConfig::default()
    };
    assert!(matches!(
        install(&mut app, config),
        Err(ConfigError::NoPhotos)
    ));
}
