//! Simulation clock.
//!
//! The clock is the single source of truth for simulated time. It starts at
//! tick 0 (nothing has happened yet) and is advanced at the start of every
//! tick, so the first tick to run is tick 1 and decision records carry
//! 1-based indices.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Tick counter for a simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationClock {
    /// Index of the last tick started (0 before the first tick).
    tick: u64,
}

impl SimulationClock {
    /// Create a clock at tick 0.
    pub const fn new() -> Self {
        Self { tick: 0 }
    }

    /// Create a clock at an arbitrary tick (useful for tests).
    pub const fn at(tick: u64) -> Self {
        Self { tick }
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Whether no tick has run yet.
    pub const fn is_initial(&self) -> bool {
        self.tick == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let clock = SimulationClock::new();
        assert_eq!(clock.tick(), 0);
        assert!(clock.is_initial());
    }

    #[test]
    fn first_advance_yields_tick_one() {
        let mut clock = SimulationClock::new();
        assert_eq!(clock.advance().ok(), Some(1));
        assert_eq!(clock.advance().ok(), Some(2));
        assert_eq!(clock.tick(), 2);
        assert!(!clock.is_initial());
    }

    #[test]
    fn overflow_is_an_error() {
        let mut clock = SimulationClock::at(u64::MAX);
        assert!(matches!(clock.advance(), Err(ClockError::TickOverflow)));
        assert_eq!(clock.tick(), u64::MAX);
    }
}
