use crate::Position;
use std::collections::BTreeMap;
use std::time::Duration;

/// Every per-match timeout a session schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Timer {
    /// Turn limit while a seat owes a discard.
    Turn(Position),
    /// Action limit of the numbered claim window.
    Window(u32),
    /// Trustee timeout after a forced action.
    Idle(Position),
    /// Dismiss vote deadline.
    Vote,
    /// Room inactivity.
    Dissolve,
}

impl std::fmt::Display for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Timer::Turn(p) => write!(f, "turn P{}", p),
            Timer::Window(n) => write!(f, "window {}", n),
            Timer::Idle(p) => write!(f, "idle P{}", p),
            Timer::Vote => write!(f, "vote"),
            Timer::Dissolve => write!(f, "dissolve"),
        }
    }
}

/// Cancellable timeouts keyed by [`Timer`], on a caller-supplied clock.
///
/// Times are offsets from the session epoch, so a test can drive the
/// clock by hand and a room can map them onto tokio instants.
pub trait Scheduler: Send + Sync + std::fmt::Debug {
    /// Arms `timer`, replacing any earlier deadline for it.
    fn schedule(&mut self, timer: Timer, at: Duration);
    fn cancel(&mut self, timer: Timer) -> bool;
    fn scheduled(&self, timer: Timer) -> Option<Duration>;
    /// Earliest armed deadline.
    fn deadline(&self) -> Option<Duration>;
    /// Disarms and returns the earliest timer due at `now`.
    /// Equal deadlines fire in [`Timer`] order.
    fn due(&mut self, now: Duration) -> Option<Timer>;
    fn clear(&mut self);
}

#[derive(Debug, Default, Clone)]
pub struct Timers {
    armed: BTreeMap<Timer, Duration>,
}

impl Scheduler for Timers {
    fn schedule(&mut self, timer: Timer, at: Duration) {
        self.armed.insert(timer, at);
    }
    fn cancel(&mut self, timer: Timer) -> bool {
        self.armed.remove(&timer).is_some()
    }
    fn scheduled(&self, timer: Timer) -> Option<Duration> {
        self.armed.get(&timer).copied()
    }
    fn deadline(&self) -> Option<Duration> {
        self.armed.values().min().copied()
    }
    fn due(&mut self, now: Duration) -> Option<Timer> {
        let timer = self
            .armed
            .iter()
            .filter(|(_, at)| **at <= now)
            .min_by_key(|(timer, at)| (**at, **timer))
            .map(|(timer, _)| *timer)?;
        self.armed.remove(&timer);
        Some(timer)
    }
    fn clear(&mut self) {
        self.armed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }
    #[test]
    fn fires_in_deadline_order() {
        let mut timers = Timers::default();
        timers.schedule(Timer::Dissolve, secs(600));
        timers.schedule(Timer::Turn(1), secs(15));
        timers.schedule(Timer::Window(3), secs(5));
        assert_eq!(timers.deadline(), Some(secs(5)));
        assert_eq!(timers.due(secs(4)), None);
        assert_eq!(timers.due(secs(20)), Some(Timer::Window(3)));
        assert_eq!(timers.due(secs(20)), Some(Timer::Turn(1)));
        assert_eq!(timers.due(secs(20)), None);
        assert_eq!(timers.deadline(), Some(secs(600)));
    }
    #[test]
    fn cancel_and_reschedule() {
        let mut timers = Timers::default();
        timers.schedule(Timer::Idle(0), secs(30));
        timers.schedule(Timer::Idle(0), secs(45));
        assert_eq!(timers.scheduled(Timer::Idle(0)), Some(secs(45)));
        assert!(timers.cancel(Timer::Idle(0)));
        assert!(!timers.cancel(Timer::Idle(0)));
        assert_eq!(timers.deadline(), None);
    }
    #[test]
    fn ties_fire_in_timer_order() {
        let mut timers = Timers::default();
        timers.schedule(Timer::Vote, secs(1));
        timers.schedule(Timer::Turn(2), secs(1));
        assert_eq!(timers.due(secs(1)), Some(Timer::Turn(2)));
        assert_eq!(timers.due(secs(1)), Some(Timer::Vote));
    }
}
