use std::num::NonZeroUsize;
use std::time::Duration;

use bevy::prelude::*;
use thiserror::Error;

use crate::config::Tuning;
use crate::constants::{DRAG_FEEDBACK_START, DRAG_THRESHOLD, TAP_DEBOUNCE_MS};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CarouselError {
    #[error("photo index {index} is out of range for {photo_count} photos")]
    IndexOutOfRange { index: usize, photo_count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// One index change, from one photo to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub from: usize,
    pub to: usize,
}

/// Transient record of one press-to-release interaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub start_x: f32,
    pub current_x: f32,
    pub started_at: Duration,
}

impl GestureSession {
    pub fn displacement(&self) -> f32 {
        self.current_x - self.start_x
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(GestureSession),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureTuning {
    pub drag_threshold: f32,
    pub tap_debounce: Duration,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            drag_threshold: DRAG_THRESHOLD,
            tap_debounce: Duration::from_millis(TAP_DEBOUNCE_MS),
        }
    }
}

impl From<&Tuning> for GestureTuning {
    fn from(tuning: &Tuning) -> Self {
        Self {
            drag_threshold: tuning.drag_threshold,
            tap_debounce: Duration::from_millis(tuning.tap_debounce_ms),
        }
    }
}

/// Visual emphasis while dragging, proportional to the drag distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFeedback {
    /// |dx| / drag threshold, capped at 1
    pub progress: f32,
}

impl DragFeedback {
    pub fn brightness(&self) -> f32 {
        if self.progress > DRAG_FEEDBACK_START {
            1.0 + self.progress * 0.2
        } else {
            1.0
        }
    }

    pub fn scale(&self) -> f32 {
        if self.progress > DRAG_FEEDBACK_START {
            1.0 + self.progress * 0.02
        } else {
            1.0
        }
    }

    /// Ready to change photos on release
    pub fn glow(&self) -> bool {
        self.progress >= 1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Navigated(Navigation),
    Tap,
    /// A tap inside the debounce window of the previous accepted tap
    TapSuppressed,
}

/// Owns the current photo index and the in-flight gesture.
///
/// `advance` and `jump_to` are the only ways to move the index; both report
/// the change as a [`Navigation`] so the caller can trigger one display refresh.
#[derive(Resource, Debug)]
pub struct Carousel {
    photo_count: NonZeroUsize,
    current_index: usize,
    state: GestureState,
    tuning: GestureTuning,
    last_tap: Option<Duration>,
}

impl Carousel {
    pub fn new(photo_count: NonZeroUsize, tuning: GestureTuning) -> Self {
        Self {
            photo_count,
            current_index: 0,
            state: GestureState::Idle,
            tuning,
            last_tap: None,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn photo_count(&self) -> usize {
        self.photo_count.get()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging(_))
    }

    pub fn tuning(&self) -> &GestureTuning {
        &self.tuning
    }

    fn set_index(&mut self, to: usize) -> Navigation {
        let from = self.current_index;
        self.current_index = to;
        Navigation { from, to }
    }

    pub fn advance(&mut self, direction: Direction) -> Navigation {
        let count = self.photo_count.get();
        let next = match direction {
            Direction::Forward => (self.current_index + 1) % count,
            Direction::Backward => (self.current_index + count - 1) % count,
        };
        self.set_index(next)
    }

    /// Moves to `index`. Returns `Ok(None)` when it is already current.
    pub fn jump_to(&mut self, index: usize) -> Result<Option<Navigation>, CarouselError> {
        if index >= self.photo_count.get() {
            return Err(CarouselError::IndexOutOfRange {
                index,
                photo_count: self.photo_count.get(),
            });
        }
        if index == self.current_index {
            return Ok(None);
        }
        Ok(Some(self.set_index(index)))
    }

    pub fn press(&mut self, x: f32, now: Duration) {
        if self.is_dragging() {
            return;
        }
        self.state = GestureState::Dragging(GestureSession {
            start_x: x,
            current_x: x,
            started_at: now,
        });
    }

    pub fn drag(&mut self, x: f32) -> Option<DragFeedback> {
        let GestureState::Dragging(session) = &mut self.state else {
            return None;
        };
        session.current_x = x;
        let progress = (session.displacement().abs() / self.tuning.drag_threshold).min(1.0);
        Some(DragFeedback { progress })
    }

    /// Ends the gesture. Swipes past the threshold move the index right away:
    /// releasing toward the right goes back, toward the left goes forward.
    pub fn release(&mut self, now: Duration) -> Option<GestureOutcome> {
        let GestureState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };

        let dx = session.displacement();
        if dx.abs() > self.tuning.drag_threshold {
            let direction = if dx > 0.0 {
                Direction::Backward
            } else {
                Direction::Forward
            };
            return Some(GestureOutcome::Navigated(self.advance(direction)));
        }

        // Anything short of a swipe is a tap
        let debounced = self
            .last_tap
            .is_some_and(|last| now.saturating_sub(last) < self.tuning.tap_debounce);
        if debounced {
            return Some(GestureOutcome::TapSuppressed);
        }
        self.last_tap = Some(now);
        Some(GestureOutcome::Tap)
    }

    pub fn cancel_gesture(&mut self) {
        self.state = GestureState::Idle;
    }
}
