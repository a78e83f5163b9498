//! Deferred, cancellable tasks driven by frame time.
//!
//! The owner advances the clock with the elapsed milliseconds of each
//! frame and receives the tasks whose deadline has passed. Nothing runs
//! on its own, so teardown is just `cancel_all`.

use tracing::debug;

/// Handle for cancelling a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug)]
struct Pending<T> {
    token: TimerToken,
    deadline_ms: f64,
    task: T,
}

/// Timer queue owned by a state machine.
#[derive(Debug)]
pub struct Scheduler<T> {
    now_ms: f64,
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Run `task` once `delay_ms` of frame time has elapsed.
    pub fn schedule(&mut self, delay_ms: f64, task: T) -> TimerToken {
        let token = TimerToken(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            token,
            deadline_ms: self.now_ms + delay_ms.max(0.0),
            task,
        });
        token
    }

    /// Drop a pending task. Returns false if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.token != token);
        self.pending.len() < before
    }

    /// Drop every pending task.
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            debug!("Scheduler: cancelling {} pending task(s)", self.pending.len());
        }
        self.pending.clear();
    }

    /// Advance the clock and return due tasks, earliest deadline first.
    /// Tasks with equal deadlines come out in scheduling order.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<T> {
        self.now_ms += dt_ms.max(0.0);
        let now = self.now_ms;

        let (mut due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.deadline_ms <= now);
        self.pending = waiting;

        due.sort_by(|a, b| {
            a.deadline_ms
                .total_cmp(&b.deadline_ms)
                .then(a.token.0.cmp(&b.token.0))
        });
        due.into_iter().map(|p| p.task).collect()
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending.iter().any(|p| p.token == token)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

// ── Tests ──────────────────────────────────────────────────
