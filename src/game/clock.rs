//! Per-turn countdown with carry-over of unused seconds.

use serde::Serialize;

/// Result of a single clock decrement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// Still running with this many seconds left
    Running(u32),
    /// This decrement took the clock to zero
    Expired,
    /// The clock was already at zero; nothing happened
    Idle,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnClock {
    seconds_per_turn: u32,
    seconds_remaining: u32,
    /// Next start resumes from `seconds_remaining` instead of a full turn
    carry_over: bool,
}

impl TurnClock {
    pub fn new(seconds_per_turn: u32) -> Self {
        Self {
            seconds_per_turn,
            seconds_remaining: seconds_per_turn,
            carry_over: false,
        }
    }

    /// Start a turn. A pending carry-over keeps the frozen remainder.
    pub fn start(&mut self) -> u32 {
        if !self.carry_over {
            self.seconds_remaining = self.seconds_per_turn;
        }
        self.carry_over = false;
        self.seconds_remaining
    }

    pub fn decrement(&mut self) -> ClockTick {
        match self.seconds_remaining {
            0 => ClockTick::Idle,
            1 => {
                self.seconds_remaining = 0;
                ClockTick::Expired
            }
            n => {
                self.seconds_remaining = n - 1;
                ClockTick::Running(n - 1)
            }
        }
    }

    /// Grant the frozen remainder to the next turn, if there is any left
    pub fn carry_over(&mut self) {
        self.carry_over = self.seconds_remaining > 0;
    }

    pub fn clear_carry_over(&mut self) {
        self.carry_over = false;
    }

    /// Seconds the next turn will start with when they differ from a full turn
    pub fn pending_carry_over(&self) -> Option<u32> {
        (self.carry_over && self.seconds_remaining < self.seconds_per_turn)
            .then_some(self.seconds_remaining)
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn seconds_per_turn(&self) -> u32 {
        self.seconds_per_turn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_to_expiry_once() {
        let mut clock = TurnClock::new(3);
        assert_eq!(clock.start(), 3);
        assert_eq!(clock.decrement(), ClockTick::Running(2));
        assert_eq!(clock.decrement(), ClockTick::Running(1));
        assert_eq!(clock.decrement(), ClockTick::Expired);
        assert_eq!(clock.decrement(), ClockTick::Idle);
        assert_eq!(clock.decrement(), ClockTick::Idle);
        assert_eq!(clock.seconds_remaining(), 0);
    }

    #[test]
    fn test_start_resets_without_carry_over() {
        let mut clock = TurnClock::new(30);
        clock.start();
        for _ in 0..18 {
            clock.decrement();
        }
        assert_eq!(clock.seconds_remaining(), 12);
        assert_eq!(clock.start(), 30);
    }

    #[test]
    fn test_carry_over_keeps_remainder() {
        let mut clock = TurnClock::new(30);
        clock.start();
        for _ in 0..18 {
            clock.decrement();
        }
        clock.carry_over();
        assert_eq!(clock.pending_carry_over(), Some(12));
        assert_eq!(clock.start(), 12);
        assert_eq!(clock.pending_carry_over(), None);

        // only one turn benefits
        assert_eq!(clock.start(), 30);
    }

    #[test]
    fn test_no_carry_over_from_expired_clock() {
        let mut clock = TurnClock::new(2);
        clock.start();
        clock.decrement();
        clock.decrement();
        clock.carry_over();
        assert_eq!(clock.pending_carry_over(), None);
        assert_eq!(clock.start(), 2);
    }
}
