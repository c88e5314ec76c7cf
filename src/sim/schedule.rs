//! Virtual-clock timer queue
//!
//! Deferred work (teleport stages, effect expiry) is queued here instead of
//! running on real timers. The owner pops due timers with the current time,
//! so tests can step time without waiting.

use serde::{Deserialize, Serialize};

use super::pads::PadId;

/// Handle for cancelling a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

/// What to do when a timer fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimerAction {
    /// Move the player onto the target pad
    Arrive { target: PadId },
    /// Player returns to idle
    FinishTeleport,
    /// Re-enable the arrival pad as a trigger
    ClearArrivalMarker { pad: PadId },
    /// Remove a departure/arrival effect
    ExpireEffect { effect_id: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub id: TimerId,
    pub due: f64,
    pub action: TimerAction,
}

/// Pending timers kept sorted by `(due, id)`, so timers due at the same
/// instant fire in the order they were scheduled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    pending: Vec<Timer>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: f64, action: TimerAction) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let at = self
            .pending
            .partition_point(|t| t.due < due || (t.due == due && t.id < id));
        self.pending.insert(at, Timer { id, due, action });
        id
    }

    /// Returns true if the timer was still pending
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Cancelling {} pending timers", self.pending.len());
        }
        self.pending.clear();
    }

    /// Remove and return the earliest timer due at or before `now`
    pub fn pop_due(&mut self, now: f64) -> Option<Timer> {
        match self.pending.first() {
            Some(t) if t.due <= now => Some(self.pending.remove(0)),
            _ => None,
        }
    }

    pub fn next_due(&self) -> Option<f64> {
        self.pending.first().map(|t| t.due)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expire(effect_id: u64) -> TimerAction {
        TimerAction::ExpireEffect { effect_id }
    }

    #[test]
    fn test_pops_in_due_order() {
        let mut sched = Scheduler::new();
        sched.schedule(300.0, expire(3));
        sched.schedule(100.0, expire(1));
        sched.schedule(200.0, expire(2));

        assert!(sched.pop_due(50.0).is_none());
        let fired: Vec<_> = std::iter::from_fn(|| sched.pop_due(1000.0))
            .map(|t| t.action)
            .collect();
        assert_eq!(fired, vec![expire(1), expire(2), expire(3)]);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_same_due_keeps_schedule_order() {
        let mut sched = Scheduler::new();
        sched.schedule(100.0, expire(1));
        sched.schedule(100.0, expire(2));
        assert_eq!(sched.pop_due(100.0).unwrap().action, expire(1));
        assert_eq!(sched.pop_due(100.0).unwrap().action, expire(2));
    }

    #[test]
    fn test_cancel() {
        let mut sched = Scheduler::new();
        let a = sched.schedule(100.0, expire(1));
        let b = sched.schedule(200.0, expire(2));
        assert!(sched.cancel(a));
        assert!(!sched.cancel(a));
        assert!(!sched.is_pending(a));
        assert!(sched.is_pending(b));
        assert_eq!(sched.next_due(), Some(200.0));

        sched.cancel_all();
        assert!(sched.pop_due(f64::MAX).is_none());
    }
}
