use std::time::Duration;

/// Handle to a task queued in a [`Scheduler`]. Used to cancel it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct Pending<T> {
    id: u64,
    due: Duration,
    payload: T,
}

/// Delayed one-shot tasks driven by frame time.
///
/// The owner advances the clock every frame and gets back the payloads that
/// came due, in due order (ties keep insertion order). Anything still pending
/// can be cancelled through its handle, so a component can be torn down
/// without leaving work behind.
#[derive(Debug)]
pub struct Scheduler<T> {
    next_id: u64,
    now: Duration,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            now: Duration::ZERO,
            pending: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay: Duration, payload: T) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now + delay,
            payload,
        });
        TaskHandle(id)
    }

    /// Returns false when the task already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|task| task.id != handle.0);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending.iter().any(|task| task.id == handle.0)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Moves the clock forward and drains every task that came due.
    pub fn advance(&mut self, delta: Duration) -> Vec<T> {
        self.advance_overdue(delta)
            .into_iter()
            .map(|(payload, _)| payload)
            .collect()
    }

    /// Like [`Scheduler::advance`], paired with how long past its due time
    /// each task was when the clock reached it.
    pub fn advance_overdue(&mut self, delta: Duration) -> Vec<(T, Duration)> {
        self.now += delta;
        let now = self.now;

        let mut due = Vec::new();
        let mut remaining = Vec::with_capacity(self.pending.len());
        for task in self.pending.drain(..) {
            if task.due <= now {
                due.push(task);
            } else {
                remaining.push(task);
            }
        }
        self.pending = remaining;

        due.sort_by_key(|task| (task.due, task.id));
        due.into_iter()
            .map(|task| (task.payload, now - task.due))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn fires_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(300), "late");
        scheduler.schedule(ms(100), "early");
        scheduler.schedule(ms(100), "early-second");

        assert!(scheduler.advance(ms(50)).is_empty());
        assert_eq!(scheduler.advance(ms(60)), vec!["early", "early-second"]);
        assert_eq!(scheduler.advance(ms(500)), vec!["late"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn delays_are_relative_to_scheduling_time() {
        let mut scheduler = Scheduler::new();
        scheduler.advance(ms(1000));
        scheduler.schedule(ms(200), 1);

        assert!(scheduler.advance(ms(199)).is_empty());
        assert_eq!(scheduler.advance(ms(1)), vec![1]);
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut scheduler = Scheduler::new();
        let keep = scheduler.schedule(ms(10), "keep");
        let drop = scheduler.schedule(ms(10), "drop");

        assert!(scheduler.cancel(drop));
        assert!(!scheduler.cancel(drop));
        assert!(scheduler.is_pending(keep));
        assert_eq!(scheduler.advance(ms(10)), vec!["keep"]);
        assert!(!scheduler.is_pending(keep));
    }

    #[test]
    fn cancel_all_clears_everything() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(10), 1);
        scheduler.schedule(ms(20), 2);

        assert_eq!(scheduler.cancel_all(), 2);
        assert!(scheduler.advance(ms(100)).is_empty());
    }

    #[test]
    fn reports_how_late_each_task_fired() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(100), "first");
        scheduler.schedule(ms(130), "second");

        assert!(scheduler.advance_overdue(ms(90)).is_empty());
        assert_eq!(
            scheduler.advance_overdue(ms(60)),
            vec![("first", ms(50)), ("second", ms(20))]
        );
    }
}
