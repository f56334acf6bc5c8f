pub mod backdrop;
pub mod config;
pub mod constants;
pub mod effects;
pub mod gallery;
pub mod schedule;
pub mod story;
pub mod ui;

use std::time::Duration;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

// Re-exports
pub use config::{ConfigError, GreetingConfig};
pub use gallery::{Carousel, DisplayRefresh, GestureTuning, NoteOverlay};
pub use story::{AppPhase, StoryState};

/// Inserts the validated config with the state built from it and adds the
/// logic plugins. Works on a headless app; windowed apps add
/// [`GreetingPlugin`] on top.
pub fn install(app: &mut App, config: GreetingConfig) -> Result<(), ConfigError> {
    config.validate()?;
    let photo_count = config.photo_count()?;

    app.insert_resource(Carousel::new(
        photo_count,
        GestureTuning::from(&config.tuning),
    ))
    .insert_resource(DisplayRefresh::from_tuning(&config.tuning))
    .insert_resource(NoteOverlay::new(Duration::from_millis(
        config.tuning.note_reveal_ms,
    )))
    .insert_resource(StoryState::new(config.chapters.len()))
    .insert_resource(effects::LoveMeter::new(photo_count.get()))
    .insert_resource(config)
    .add_plugins((
        story::StoryPlugin,
        gallery::GalleryPlugin,
        effects::EffectsPlugin,
    ));

    Ok(())
}

/// Windowed app with logging and egui set up, before any greeting state exists.
pub fn app() -> App {
    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(bevy::log::LogPlugin {
                level: bevy::log::Level::INFO,
                filter: "wgpu=warn,naga=warn,info".into(),
                ..default()
            })
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Happy Monthsary 💕".into(),
                    ..default()
                }),
                ..default()
            }),
    )
    .add_plugins(EguiPlugin {
        enable_multipass_for_primary_context: false,
    });

    app
}

/// Window-bound plugins: the particle backdrop, raw input collection and egui.
#[derive(Default)]
pub struct GreetingPlugin;

impl Plugin for GreetingPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            backdrop::BackdropPlugin,
            gallery::input::GalleryInputPlugin,
            ui::UiPlugin,
        ));
    }
}
