use std::time::Duration;

use bevy::prelude::*;

use crate::config::Tuning;
use crate::schedule::{Scheduler, TaskHandle};

/// Entrance effects, used in turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntranceAnimation {
    HeartEntrance,
    SparkleBurst,
    LoveWave,
    FloatingHearts,
}

impl EntranceAnimation {
    pub const ALL: [EntranceAnimation; 4] = [
        EntranceAnimation::HeartEntrance,
        EntranceAnimation::SparkleBurst,
        EntranceAnimation::LoveWave,
        EntranceAnimation::FloatingHearts,
    ];

    /// Card pose at `t` in `[0, 1]` of the entrance.
    pub fn pose(self, t: f32) -> CardPose {
        let t = t.clamp(0.0, 1.0);
        let ease = 1.0 - (1.0 - t).powi(3);
        match self {
            EntranceAnimation::HeartEntrance => CardPose {
                scale: 0.8 + 0.2 * ease + 0.06 * (t * std::f32::consts::PI).sin(),
                opacity: ease,
                lift: 0.0,
                tilt: 0.0,
            },
            EntranceAnimation::SparkleBurst => CardPose {
                scale: 0.6 + 0.4 * ease,
                opacity: t.min(1.0),
                lift: 0.0,
                tilt: (1.0 - ease) * 0.25,
            },
            EntranceAnimation::LoveWave => CardPose {
                scale: 1.0,
                opacity: ease,
                lift: (t * std::f32::consts::TAU).sin() * 12.0 * (1.0 - t),
                tilt: 0.0,
            },
            EntranceAnimation::FloatingHearts => CardPose {
                scale: 0.9 + 0.1 * ease,
                opacity: ease,
                lift: 40.0 * (1.0 - ease),
                tilt: 0.0,
            },
        }
    }
}

/// How the gallery card is drawn at a given moment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPose {
    pub scale: f32,
    pub opacity: f32,
    /// Vertical offset in logical pixels, positive is down
    pub lift: f32,
    /// Rotation in radians
    pub tilt: f32,
}

impl CardPose {
    pub const RESTING: CardPose = CardPose {
        scale: 1.0,
        opacity: 1.0,
        lift: 0.0,
        tilt: 0.0,
    };

    pub const FADED: CardPose = CardPose {
        scale: 0.8,
        opacity: 0.0,
        lift: 0.0,
        tilt: 0.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    FadingOut { target: usize },
    Entering { index: usize, animation: EntranceAnimation },
}

/// Observable steps of a refresh, in the order they happen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStep {
    FadeOut { target: usize },
    Swap { index: usize, animation: EntranceAnimation },
    Retract { animation: EntranceAnimation },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshTask {
    Swap,
    Retract,
}

/// Fade out, swap in the new photo, play an entrance, retract it.
///
/// Only one refresh runs at a time. A request during the fade-out retargets
/// the pending swap; a request during the entrance retracts the running
/// animation first and then starts a new fade-out.
#[derive(Resource, Debug)]
pub struct DisplayRefresh {
    phase: RefreshPhase,
    displayed: Option<usize>,
    next_animation: usize,
    phase_elapsed: Duration,
    fade_out: Duration,
    entrance: Duration,
    scheduler: Scheduler<RefreshTask>,
    pending: Option<TaskHandle>,
}

impl DisplayRefresh {
    pub fn new(fade_out: Duration, entrance: Duration) -> Self {
        Self {
            phase: RefreshPhase::Idle,
            displayed: None,
            next_animation: 0,
            phase_elapsed: Duration::ZERO,
            fade_out,
            entrance,
            scheduler: Scheduler::new(),
            pending: None,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(
            Duration::from_millis(tuning.fade_out_ms),
            Duration::from_millis(tuning.entrance_ms),
        )
    }

    pub fn phase(&self) -> RefreshPhase {
        self.phase
    }

    /// Photo currently on the card, if any has been swapped in yet
    pub fn displayed(&self) -> Option<usize> {
        self.displayed
    }

    pub fn is_busy(&self) -> bool {
        self.phase != RefreshPhase::Idle
    }

    pub fn pose(&self) -> CardPose {
        match self.phase {
            RefreshPhase::Idle => CardPose::RESTING,
            RefreshPhase::FadingOut { .. } => CardPose::FADED,
            RefreshPhase::Entering { animation, .. } => {
                let t = self.phase_elapsed.as_secs_f32() / self.entrance.as_secs_f32().max(f32::EPSILON);
                animation.pose(t)
            }
        }
    }

    fn start_fade(&mut self, target: usize, steps: &mut Vec<RefreshStep>) {
        self.phase = RefreshPhase::FadingOut { target };
        self.phase_elapsed = Duration::ZERO;
        self.pending = Some(self.scheduler.schedule(self.fade_out, RefreshTask::Swap));
        steps.push(RefreshStep::FadeOut { target });
    }

    pub fn request(&mut self, index: usize) -> Vec<RefreshStep> {
        let mut steps = Vec::new();
        match self.phase {
            RefreshPhase::Idle => self.start_fade(index, &mut steps),
            RefreshPhase::FadingOut { target } => {
                if target != index {
                    debug!("Refresh retargeted from photo {} to {}", target, index);
                }
                self.phase = RefreshPhase::FadingOut { target: index };
            }
            RefreshPhase::Entering { animation, .. } => {
                if let Some(handle) = self.pending.take() {
                    self.scheduler.cancel(handle);
                }
                steps.push(RefreshStep::Retract { animation });
                self.start_fade(index, &mut steps);
            }
        }
        steps
    }

    pub fn advance(&mut self, delta: Duration) -> Vec<RefreshStep> {
        self.phase_elapsed += delta;
        let mut steps = Vec::new();
        let mut fired = self.scheduler.advance_overdue(delta);
        while !fired.is_empty() {
            for (task, overdue) in fired {
                self.fire(task, overdue, &mut steps);
            }
            // A long frame can carry a swap past its whole entrance
            fired = self.scheduler.advance_overdue(Duration::ZERO);
        }
        steps
    }

    fn fire(&mut self, task: RefreshTask, overdue: Duration, steps: &mut Vec<RefreshStep>) {
        match (task, self.phase) {
            (RefreshTask::Swap, RefreshPhase::FadingOut { target }) => {
                let animation =
                    EntranceAnimation::ALL[self.next_animation % EntranceAnimation::ALL.len()];
                self.next_animation = (self.next_animation + 1) % EntranceAnimation::ALL.len();
                self.displayed = Some(target);
                self.phase = RefreshPhase::Entering {
                    index: target,
                    animation,
                };
                // The entrance started when the swap came due, not at the end of the frame
                self.phase_elapsed = overdue;
                self.pending = Some(self.scheduler.schedule(
                    self.entrance.saturating_sub(overdue),
                    RefreshTask::Retract,
                ));
                steps.push(RefreshStep::Swap {
                    index: target,
                    animation,
                });
            }
            (RefreshTask::Retract, RefreshPhase::Entering { animation, .. }) => {
                self.phase = RefreshPhase::Idle;
                self.pending = None;
                steps.push(RefreshStep::Retract { animation });
            }
            (task, phase) => {
                warn!("Dropping stale refresh task {:?} in phase {:?}", task, phase);
            }
        }
    }

    /// Cancels everything still scheduled and leaves the card at rest.
    pub fn teardown(&mut self) -> usize {
        let cancelled = self.scheduler.cancel_all();
        self.pending = None;
        self.phase = RefreshPhase::Idle;
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn refresh() -> DisplayRefresh {
        DisplayRefresh::new(ms(200), ms(1600))
    }

    #[test]
    fn full_cycle() {
        let mut refresh = refresh();
        assert_eq!(refresh.request(2), vec![RefreshStep::FadeOut { target: 2 }]);
        assert_eq!(refresh.pose(), CardPose::FADED);
        assert!(refresh.advance(ms(199)).is_empty());

        let swap = refresh.advance(ms(1));
        assert_eq!(
            swap,
            vec![RefreshStep::Swap {
                index: 2,
                animation: EntranceAnimation::HeartEntrance
            }]
        );
        assert_eq!(refresh.displayed(), Some(2));

        assert!(refresh.advance(ms(1599)).is_empty());
        assert_eq!(
            refresh.advance(ms(1)),
            vec![RefreshStep::Retract {
                animation: EntranceAnimation::HeartEntrance
            }]
        );
        assert!(!refresh.is_busy());
        assert_eq!(refresh.pose(), CardPose::RESTING);
    }

    #[test]
    fn animations_cycle_round_robin() {
        let mut refresh = refresh();
        let mut seen = Vec::new();
        for index in 0..6 {
            refresh.request(index);
            for step in refresh.advance(ms(200)) {
                if let RefreshStep::Swap { animation, .. } = step {
                    seen.push(animation);
                }
            }
            refresh.advance(ms(1600));
        }
        assert_eq!(&seen[..4], &EntranceAnimation::ALL);
        assert_eq!(seen[4], EntranceAnimation::HeartEntrance);
        assert_eq!(seen[5], EntranceAnimation::SparkleBurst);
    }

    #[test]
    fn requests_during_fade_coalesce() {
        let mut refresh = refresh();
        refresh.request(1);
        refresh.advance(ms(50));
        assert!(refresh.request(2).is_empty());
        assert!(refresh.request(3).is_empty());

        let steps = refresh.advance(ms(150));
        assert_eq!(steps.len(), 1);
        assert!(matches!(steps[0], RefreshStep::Swap { index: 3, .. }));
    }

    #[test]
    fn request_during_entrance_retracts_first() {
        let mut refresh = refresh();
        refresh.request(1);
        refresh.advance(ms(200));
        refresh.advance(ms(500));

        let steps = refresh.request(4);
        assert_eq!(
            steps,
            vec![
                RefreshStep::Retract {
                    animation: EntranceAnimation::HeartEntrance
                },
                RefreshStep::FadeOut { target: 4 },
            ]
        );

        // The cancelled retraction from the first refresh never fires. The
        // swap came due 900 ms into this frame, so 700 ms of entrance remain.
        let steps = refresh.advance(ms(1100));
        assert_eq!(steps.len(), 1);
        assert!(matches!(steps[0], RefreshStep::Swap { index: 4, .. }));
        assert!(refresh.advance(ms(699)).is_empty());
        assert_eq!(refresh.advance(ms(1)).len(), 1);
    }

    #[test]
    fn never_two_swaps_without_a_retract_between() {
        let mut refresh = refresh();
        let mut log = Vec::new();
        for (i, gap) in [10u64, 90, 250, 40, 700, 5, 1800, 120].iter().enumerate() {
            log.extend(refresh.request(i % 6));
            log.extend(refresh.advance(ms(*gap)));
        }
        log.extend(refresh.advance(ms(5000)));

        let mut entering = false;
        for step in log {
            match step {
                RefreshStep::Swap { .. } => {
                    assert!(!entering, "swap while another entrance is running");
                    entering = true;
                }
                RefreshStep::Retract { .. } => entering = false,
                RefreshStep::FadeOut { .. } => assert!(!entering),
            }
        }
        assert!(!refresh.is_busy());
    }

    #[test]
    fn long_frame_keeps_entrance_time_past_the_swap() {
        let mut refresh = refresh();
        refresh.request(2);

        // Swap was due at 200 ms; the frame ran to 300 ms
        let steps = refresh.advance(ms(300));
        assert!(matches!(steps[..], [RefreshStep::Swap { index: 2, .. }]));
        let pose = refresh.pose();
        let expected = EntranceAnimation::HeartEntrance.pose(0.0625);
        assert!(pose.opacity > 0.0);
        assert!((pose.opacity - expected.opacity).abs() < 1e-4);
        assert!((pose.scale - expected.scale).abs() < 1e-4);

        assert!(refresh.advance(ms(1499)).is_empty());
        assert_eq!(
            refresh.advance(ms(1)),
            vec![RefreshStep::Retract {
                animation: EntranceAnimation::HeartEntrance
            }]
        );
    }

    #[test]
    fn frame_longer_than_the_whole_refresh_settles() {
        let mut refresh = refresh();
        refresh.request(1);
        let steps = refresh.advance(ms(5000));
        assert_eq!(steps.len(), 2);
        assert!(matches!(steps[1], RefreshStep::Retract { .. }));
        assert!(!refresh.is_busy());
        assert_eq!(refresh.displayed(), Some(1));
    }

    #[test]
    fn teardown_cancels_pending_work() {
        let mut refresh = refresh();
        refresh.request(1);
        assert_eq!(refresh.teardown(), 1);
        assert!(refresh.advance(ms(5000)).is_empty());
        assert_eq!(refresh.displayed(), None);
    }

    #[test]
    fn poses_settle_at_rest() {
        for animation in EntranceAnimation::ALL {
            let end = animation.pose(1.0);
            assert!((end.scale - 1.0).abs() < 1e-3, "{animation:?}");
            assert!((end.opacity - 1.0).abs() < 1e-3);
            assert!(end.lift.abs() < 1e-3);
            assert!(end.tilt.abs() < 1e-3);
        }
    }
}
