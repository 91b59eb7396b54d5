use crate::domain::{TaskId, TaskStore};
use std::time::Duration;

/// Length of one timer tick
pub const TICK: Duration = Duration::from_secs(1);

/// Minutes credited to the active task per tick
const MINUTES_PER_TICK: f64 = 1.0 / 60.0;

/// Timer state: idle, or running against exactly one task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Idle,
    Running { task_id: TaskId, elapsed_secs: u64 },
}

/// What `start` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTransition {
    Started,
    Switched { from: TaskId },
    Stopped,
}

/// Tracks time against at most one task.
///
/// Wall time is fed in through `advance`; whole ticks are credited to the
/// task and the remainder is carried to the next call. Stopping or switching
/// drops the carry, so a partial second never leaks onto another task.
#[derive(Debug, Clone, Default)]
pub struct TimerTracker {
    state: TimerState,
    carry: Duration,
}

impl TimerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// The active timer target, if any
    pub fn active(&self) -> Option<TaskId> {
        match self.state {
            TimerState::Running { task_id, .. } => Some(task_id),
            TimerState::Idle => None,
        }
    }

    /// Seconds on the clock for the current run (0 when idle)
    pub fn elapsed_secs(&self) -> u64 {
        match self.state {
            TimerState::Running { elapsed_secs, .. } => elapsed_secs,
            TimerState::Idle => 0,
        }
    }

    pub fn is_running_for(&self, id: TaskId) -> bool {
        self.active() == Some(id)
    }

    /// Start timing `id`, or stop if it is already the target
    pub fn start(&mut self, id: TaskId) -> TimerTransition {
        let previous = self.active();
        self.carry = Duration::ZERO;

        match previous {
            Some(current) if current == id => {
                self.state = TimerState::Idle;
                tracing::debug!(task_id = id, "timer stopped");
                TimerTransition::Stopped
            }
            Some(current) => {
                self.state = TimerState::Running {
                    task_id: id,
                    elapsed_secs: 0,
                };
                tracing::debug!(from = current, to = id, "timer switched");
                TimerTransition::Switched { from: current }
            }
            None => {
                self.state = TimerState::Running {
                    task_id: id,
                    elapsed_secs: 0,
                };
                tracing::debug!(task_id = id, "timer started");
                TimerTransition::Started
            }
        }
    }

    /// Go idle. Returns false if already idle.
    pub fn stop(&mut self) -> bool {
        self.carry = Duration::ZERO;
        if self.state == TimerState::Idle {
            return false;
        }
        self.state = TimerState::Idle;
        true
    }

    /// Stop only if `id` is the current target
    pub fn stop_if_target(&mut self, id: TaskId) -> bool {
        if self.is_running_for(id) {
            self.stop()
        } else {
            false
        }
    }

    /// Apply one tick. Returns true if time was credited.
    pub fn tick(&mut self, store: &mut TaskStore) -> bool {
        let TimerState::Running { task_id, elapsed_secs } = self.state else {
            return false;
        };

        if !store.add_time(task_id, MINUTES_PER_TICK) {
            // Target vanished (deleted elsewhere or replaced by import)
            tracing::debug!(task_id, "timer target missing, stopping");
            self.stop();
            return false;
        }

        self.state = TimerState::Running {
            task_id,
            elapsed_secs: elapsed_secs + 1,
        };
        true
    }

    /// Feed wall time into the timer. Returns the number of ticks credited.
    pub fn advance(&mut self, delta: Duration, store: &mut TaskStore) -> u64 {
        if self.state == TimerState::Idle {
            return 0;
        }

        self.carry += delta;
        let mut ticks = 0;
        while self.carry >= TICK {
            self.carry -= TICK;
            if !self.tick(store) {
                break;
            }
            ticks += 1;
        }
        ticks
    }
}
