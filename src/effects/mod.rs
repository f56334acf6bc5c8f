pub mod decor;
pub mod love_meter;
pub mod timeline;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::backdrop::camera::viewport_size;
use crate::config::GreetingConfig;
use crate::gallery::{GalleryTapped, PhotoChanged};
use crate::story::{ChapterShown, StoryCompleted};
pub use decor::{DecorKind, Decoration};
pub use love_meter::{LoveMeter, MeterReading};
pub use timeline::Timeline;

/// Delay before the last-photo celebration starts
pub const CELEBRATION_DELAY: f32 = 1.0;

const CONFETTI_COUNT: usize = 100;
const INITIAL_HEARTS: usize = 10;

/// Ambient hearts rising from the bottom edge
#[derive(Resource, Debug)]
pub struct HeartCadence(pub Timer);

impl Default for HeartCadence {
    fn default() -> Self {
        Self(Timer::from_seconds(0.8, TimerMode::Repeating))
    }
}

/// Next random heart pop, re-rolled after every pop
#[derive(Resource, Debug)]
pub struct HeartPopCadence(pub Timer);

impl HeartPopCadence {
    fn roll(rng: &mut impl Rng) -> Timer {
        Timer::from_seconds(rng.gen_range(8.0..15.0), TimerMode::Once)
    }
}

impl Default for HeartPopCadence {
    fn default() -> Self {
        Self(Self::roll(&mut rand::thread_rng()))
    }
}

/// Decorations and the read-only observers of the carousel.
pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Timeline>()
            .init_resource::<HeartCadence>()
            .init_resource::<HeartPopCadence>()
            .add_systems(Startup, (log_banner, spawn_initial_hearts))
            .add_systems(
                Update,
                (
                    show_photo_counter,
                    update_love_meter,
                    highlight_timeline,
                    maybe_float_message,
                    celebrate_completion,
                    burst_sparkles,
                    tap_sparkles,
                    story_hearts,
                    story_confetti,
                ),
            )
            .add_systems(
                Update,
                (spawn_ambient_hearts, spawn_heart_pops, age_decorations),
            );
    }
}

fn log_banner(config: Res<GreetingConfig>) {
    for line in &config.banner {
        info!("{}", line);
    }
}

fn spawn_initial_hearts(mut commands: Commands, windows: Query<&Window, With<PrimaryWindow>>) {
    let viewport = viewport_size(&windows);
    let mut rng = rand::thread_rng();
    commands.spawn_batch(
        (0..INITIAL_HEARTS)
            .map(|i| decor::floating_heart(viewport, i as f32 * 0.3, &mut rng))
            .collect::<Vec<_>>(),
    );
}

fn show_photo_counter(
    mut changed: EventReader<PhotoChanged>,
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    for event in changed.read() {
        let text = format!("💖 {} / {} 💖", event.index + 1, event.photo_count);
        commands.spawn(decor::counter_toast(text, viewport_size(&windows)));
    }
}

fn update_love_meter(mut changed: EventReader<PhotoChanged>, mut meter: ResMut<LoveMeter>) {
    for event in changed.read() {
        meter.update(event.index, event.photo_count);
    }
}

fn highlight_timeline(mut changed: EventReader<PhotoChanged>, mut timeline: ResMut<Timeline>) {
    for event in changed.read() {
        timeline.highlight(event.index);
    }
}

fn maybe_float_message(
    mut changed: EventReader<PhotoChanged>,
    mut commands: Commands,
    config: Res<GreetingConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let mut rng = rand::thread_rng();
    for _ in changed.read() {
        if !rng.gen_bool(config.tuning.floating_message_chance) {
            continue;
        }
        if let Some(message) = config.messages.choose(&mut rng) {
            commands.spawn(decor::floating_message(
                message,
                viewport_size(&windows),
                0.0,
                &mut rng,
            ));
        }
    }
}

fn celebrate_completion(
    mut changed: EventReader<PhotoChanged>,
    mut commands: Commands,
    config: Res<GreetingConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let viewport = viewport_size(&windows);
    let mut rng = rand::thread_rng();
    for event in changed.read() {
        if event.index + 1 != event.photo_count {
            continue;
        }
        info!("All {} memories explored", event.photo_count);
        commands.spawn_batch(decor::confetti(
            viewport,
            CONFETTI_COUNT,
            CELEBRATION_DELAY,
            &mut rng,
        ));
        if let Some(message) = config.messages.choose(&mut rng) {
            commands.spawn(decor::floating_message(
                message,
                viewport,
                CELEBRATION_DELAY,
                &mut rng,
            ));
        }
        commands.spawn(decor::banner(
            "🎉 Congratulations! 🎉\nYou've explored all our memories!\n💕 Here's to forever together! 💕".into(),
            viewport,
            CELEBRATION_DELAY,
        ));
    }
}

fn burst_sparkles(
    mut changed: EventReader<PhotoChanged>,
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let center = viewport_size(&windows) * 0.5;
    let mut rng = rand::thread_rng();
    for _ in changed.read() {
        commands.spawn_batch(decor::sparkle_ring(center, 30, &mut rng));
    }
}

fn tap_sparkles(mut tapped: EventReader<GalleryTapped>, mut commands: Commands) {
    let mut rng = rand::thread_rng();
    for tap in tapped.read() {
        commands.spawn_batch(decor::tap_sparkles(tap.position, &mut rng));
    }
}

fn story_hearts(
    mut shown: EventReader<ChapterShown>,
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let center = viewport_size(&windows) * 0.5;
    let mut rng = rand::thread_rng();
    for _ in shown.read() {
        commands.spawn_batch(decor::story_hearts(center, &mut rng));
    }
}

fn story_confetti(
    mut completed: EventReader<StoryCompleted>,
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let viewport = viewport_size(&windows);
    let mut rng = rand::thread_rng();
    for _ in completed.read() {
        commands.spawn_batch(decor::confetti(viewport, CONFETTI_COUNT, 0.0, &mut rng));
    }
}

fn spawn_ambient_hearts(
    time: Res<Time>,
    mut cadence: ResMut<HeartCadence>,
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    cadence.0.tick(time.delta());
    let due = cadence.0.times_finished_this_tick();
    if due == 0 {
        return;
    }
    let viewport = viewport_size(&windows);
    let mut rng = rand::thread_rng();
    for _ in 0..due {
        commands.spawn(decor::floating_heart(viewport, 0.0, &mut rng));
    }
}

fn spawn_heart_pops(
    time: Res<Time>,
    mut cadence: ResMut<HeartPopCadence>,
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    cadence.0.tick(time.delta());
    if !cadence.0.just_finished() {
        return;
    }
    let mut rng = rand::thread_rng();
    commands.spawn(decor::heart_pop(viewport_size(&windows), &mut rng));
    cadence.0 = HeartPopCadence::roll(&mut rng);
}

/// Ages every decoration and despawns the expired ones.
fn age_decorations(
    time: Res<Time>,
    mut commands: Commands,
    mut query: Query<(Entity, &mut Decoration)>,
) {
    let dt = time.delta_secs();
    for (entity, mut decoration) in query.iter_mut() {
        decoration.tick(dt);
        if decoration.is_expired() {
            commands.entity(entity).despawn();
        }
    }
}

