use std::time::Duration;

use bevy::prelude::*;

use crate::config::GreetingConfig;
use crate::schedule::{Scheduler, TaskHandle};

/// The intro story runs first; the gallery opens once the reader leaves it.
#[derive(States, Reflect, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[reflect(State)]
pub enum AppPhase {
    #[default]
    Story,
    Gallery,
}

/// Delay between reaching the final chapter and the completion overlay
pub const COMPLETION_DELAY: Duration = Duration::from_secs(2);

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryCommand {
    Previous,
    Next,
    EnterGallery,
}

/// A chapter became visible (1-based)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterShown(pub usize);

/// The completion overlay just opened
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryCompleted;

#[derive(Resource, Debug)]
pub struct StoryState {
    current: usize,
    total: usize,
    completion_open: bool,
    completion: Scheduler<()>,
    pending: Option<TaskHandle>,
}

impl StoryState {
    /// `total` is clamped to at least one chapter.
    pub fn new(total: usize) -> Self {
        let mut story = Self {
            current: 1,
            total: total.max(1),
            completion_open: false,
            completion: Scheduler::new(),
            pending: None,
        };
        // A one-chapter story starts on its last page
        if story.is_last() {
            story.pending = Some(story.completion.schedule(COMPLETION_DELAY, ()));
        }
        story
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn progress(&self) -> f32 {
        self.current as f32 / self.total as f32
    }

    pub fn label(&self) -> String {
        format!("Chapter {} of {}", self.current, self.total)
    }

    pub fn can_go_back(&self) -> bool {
        self.current > 1
    }

    pub fn can_go_forward(&self) -> bool {
        self.current < self.total
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total
    }

    pub fn completion_open(&self) -> bool {
        self.completion_open
    }

    /// Applies the chapter change, returning the new chapter when it moved.
    pub fn next(&mut self) -> Option<usize> {
        if !self.can_go_forward() {
            return None;
        }
        self.current += 1;
        self.on_chapter_changed();
        Some(self.current)
    }

    pub fn previous(&mut self) -> Option<usize> {
        if !self.can_go_back() {
            return None;
        }
        self.current -= 1;
        self.on_chapter_changed();
        Some(self.current)
    }

    fn on_chapter_changed(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.completion.cancel(handle);
        }
        if self.is_last() {
            self.pending = Some(self.completion.schedule(COMPLETION_DELAY, ()));
        }
    }

    /// Opens the completion overlay once its delay has passed.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.completion.advance(delta).is_empty() {
            return false;
        }
        self.pending = None;
        self.completion_open = true;
        true
    }

    pub fn finish(&mut self) {
        self.completion.cancel_all();
        self.pending = None;
        self.completion_open = false;
    }
}

pub struct StoryPlugin;

impl Plugin for StoryPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppPhase>()
            .register_type::<AppPhase>()
            .add_event::<StoryCommand>()
            .add_event::<ChapterShown>()
            .add_event::<StoryCompleted>()
            .add_systems(Startup, announce_first_chapter)
            .add_systems(
                Update,
                (apply_story_commands, drive_story_completion)
                    .chain()
                    .run_if(in_state(AppPhase::Story)),
            )
            .add_systems(OnExit(AppPhase::Story), close_story);
    }
}

fn announce_first_chapter(
    config: Res<GreetingConfig>,
    story: Res<StoryState>,
    mut shown: EventWriter<ChapterShown>,
) {
    if let Some(chapter) = config.chapters.first() {
        info!("Story begins: {}", chapter.title);
    }
    shown.write(ChapterShown(story.current()));
}

fn apply_story_commands(
    mut commands: EventReader<StoryCommand>,
    mut story: ResMut<StoryState>,
    mut next_phase: ResMut<NextState<AppPhase>>,
    mut shown: EventWriter<ChapterShown>,
) {
    for command in commands.read() {
        let moved = match command {
            StoryCommand::Previous => story.previous(),
            StoryCommand::Next => story.next(),
            StoryCommand::EnterGallery => {
                info!("Leaving the story at {}", story.label());
                next_phase.set(AppPhase::Gallery);
                None
            }
        };
        if let Some(chapter) = moved {
            shown.write(ChapterShown(chapter));
        }
    }
}

fn drive_story_completion(
    time: Res<Time>,
    mut story: ResMut<StoryState>,
    mut completed: EventWriter<StoryCompleted>,
) {
    if story.tick(time.delta()) {
        info!("Story complete");
        completed.write(StoryCompleted);
    }
}

fn close_story(mut story: ResMut<StoryState>) {
    story.finish();
}
