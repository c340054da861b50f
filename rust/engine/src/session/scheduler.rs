// rust/engine/src/session/scheduler.rs
#![forbid(unsafe_code)]

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::engine::PieceId;

/// The three re-arming callbacks a session juggles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Timer {
    Gravity,
    Bot,
    Lock(PieceId),
}

/// Virtual-millisecond timer queue.
///
/// Timers fire in (due time, arming order); the clock jumps to each timer's due
/// time as it is popped, so nothing ever runs concurrently.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    seq: u64,
    queue: BinaryHeap<Reverse<(u64, u64, Timer)>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule(&mut self, delay_ms: u64, timer: Timer) {
        let due = self.now_ms.saturating_add(delay_ms);
        self.queue.push(Reverse((due, self.seq, timer)));
        self.seq += 1;
    }

    pub fn cancel_all(&mut self) {
        self.queue.clear();
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_armed(&self, timer: Timer) -> bool {
        self.queue.iter().any(|Reverse((_, _, t))| *t == timer)
    }

    pub fn next_due(&self) -> Option<u64> {
        self.queue.peek().map(|Reverse((due, _, _))| *due)
    }

    /// Pops the earliest timer and moves the clock to its due time.
    pub fn pop(&mut self) -> Option<Timer> {
        let Reverse((due, _, timer)) = self.queue.pop()?;
        self.now_ms = self.now_ms.max(due);
        Some(timer)
    }

    /// Like `pop`, but only if the timer is due at or before `deadline_ms`.
    /// Otherwise the clock moves to `deadline_ms`.
    pub fn pop_until(&mut self, deadline_ms: u64) -> Option<Timer> {
        match self.next_due() {
            Some(due) if due <= deadline_ms => self.pop(),
            _ => {
                self.now_ms = self.now_ms.max(deadline_ms);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_fire_in_due_order_then_arming_order() {
        let mut s = Scheduler::new();
        s.schedule(10, Timer::Bot);
        s.schedule(5, Timer::Gravity);
        s.schedule(10, Timer::Lock(PieceId(3)));

        assert_eq!(s.pop(), Some(Timer::Gravity));
        assert_eq!(s.now_ms(), 5);
        assert_eq!(s.pop(), Some(Timer::Bot));
        assert_eq!(s.pop(), Some(Timer::Lock(PieceId(3))));
        assert_eq!(s.now_ms(), 10);
        assert_eq!(s.pop(), None);
    }

    #[test]
    fn pop_until_stops_at_deadline_and_advances_clock() {
        let mut s = Scheduler::new();
        s.schedule(50, Timer::Gravity);

        assert_eq!(s.pop_until(20), None);
        assert_eq!(s.now_ms(), 20);
        assert!(s.is_armed(Timer::Gravity));

        // Delays are relative to the advanced clock.
        s.schedule(10, Timer::Bot);
        assert_eq!(s.pop_until(100), Some(Timer::Bot));
        assert_eq!(s.now_ms(), 30);
    }

    #[test]
    fn cancel_all_empties_the_queue() {
        let mut s = Scheduler::new();
        s.schedule(1, Timer::Gravity);
        s.schedule(1, Timer::Bot);
        s.cancel_all();
        assert_eq!(s.pending(), 0);
        assert_eq!(s.pop(), None);
    }
}
