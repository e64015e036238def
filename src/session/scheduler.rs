//! Cancellable periodic tasks on a caller-driven clock
//!
//! Nothing here reads wall time. The platform loop (or a test) advances the
//! clock in milliseconds and pops due firings one at a time, so a firing that
//! ends the session can cancel the rest before they run.

/// Handle for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u32);

#[derive(Debug, Clone, Copy)]
enum TaskState {
    Armed { next_due_ms: u64 },
    /// Time left until the next firing when suspended
    Suspended { remaining_ms: u64 },
}

#[derive(Debug, Clone)]
struct PeriodicTask {
    id: TaskId,
    interval_ms: u64,
    state: TaskState,
}

/// Fixed-interval scheduler
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<PeriodicTask>,
    next_id: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task firing every `interval_ms`, first at `now_ms + interval_ms`
    pub fn schedule(&mut self, interval_ms: u64, now_ms: u64) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let interval_ms = interval_ms.max(1);
        self.tasks.push(PeriodicTask {
            id,
            interval_ms,
            state: TaskState::Armed {
                next_due_ms: now_ms + interval_ms,
            },
        });
        id
    }

    /// Remove a task; false if it was already gone
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Stop firing, remembering the time left in the current period
    pub fn suspend(&mut self, id: TaskId, now_ms: u64) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => match task.state {
                TaskState::Armed { next_due_ms } => {
                    task.state = TaskState::Suspended {
                        remaining_ms: next_due_ms.saturating_sub(now_ms),
                    };
                    true
                }
                TaskState::Suspended { .. } => false,
            },
            None => false,
        }
    }

    /// Re-arm a suspended task with its remaining time
    pub fn resume(&mut self, id: TaskId, now_ms: u64) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => match task.state {
                TaskState::Suspended { remaining_ms } => {
                    task.state = TaskState::Armed {
                        next_due_ms: now_ms + remaining_ms,
                    };
                    true
                }
                TaskState::Armed { .. } => false,
            },
            None => false,
        }
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Earliest firing due at or before `now_ms`; ties go to the older task.
    /// The returned task is re-armed one interval after its due time.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TaskId, u64)> {
        let task = self
            .tasks
            .iter_mut()
            .filter_map(|t| {
                let TaskState::Armed { next_due_ms } = t.state else {
                    return None;
                };
                (next_due_ms <= now_ms).then_some((next_due_ms, t))
            })
            .min_by_key(|(due, t)| (*due, t.id))
            .map(|(_, t)| t)?;

        let TaskState::Armed { next_due_ms } = task.state else {
            return None;
        };
        task.state = TaskState::Armed {
            next_due_ms: next_due_ms + task.interval_ms,
        };
        Some((task.id, next_due_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire_all(s: &mut Scheduler, now: u64) -> Vec<(TaskId, u64)> {
        std::iter::from_fn(|| s.pop_due(now)).collect()
    }

    #[test]
    fn test_first_firing_after_one_interval() {
        let mut s = Scheduler::new();
        let id = s.schedule(100, 0);
        assert!(s.pop_due(99).is_none());
        assert_eq!(s.pop_due(100), Some((id, 100)));
        assert!(s.pop_due(100).is_none());
    }

    #[test]
    fn test_catches_up_in_order() {
        let mut s = Scheduler::new();
        let fast = s.schedule(100, 0);
        let slow = s.schedule(250, 0);

        let fired = fire_all(&mut s, 300);
        assert_eq!(
            fired,
            vec![(fast, 100), (fast, 200), (slow, 250), (fast, 300)]
        );
    }

    #[test]
    fn test_ties_go_to_older_task() {
        let mut s = Scheduler::new();
        let a = s.schedule(100, 0);
        let b = s.schedule(100, 0);
        assert_eq!(fire_all(&mut s, 100), vec![(a, 100), (b, 100)]);
    }

    #[test]
    fn test_suspend_preserves_remaining_time() {
        let mut s = Scheduler::new();
        let id = s.schedule(100, 0);

        assert!(s.suspend(id, 40));
        assert!(!s.suspend(id, 40));
        assert!(fire_all(&mut s, 1000).is_empty());

        assert!(s.resume(id, 1000));
        assert!(!s.resume(id, 1000));
        assert!(s.pop_due(1059).is_none());
        assert_eq!(s.pop_due(1060), Some((id, 1060)));
    }

    #[test]
    fn test_cancel_once() {
        let mut s = Scheduler::new();
        let id = s.schedule(100, 0);
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        assert!(!s.is_scheduled(id));
        assert!(s.pop_due(10_000).is_none());
        assert!(s.is_empty());
    }
}
