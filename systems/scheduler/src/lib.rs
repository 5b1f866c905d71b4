#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-interval scheduler that turns real-time frames into simulation steps.

use std::time::Duration;

use ascii_city_core::{Command, Event};

/// Default spacing between simulation steps.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1_000);

/// Configuration parameters required to construct the scheduler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    tick_interval: Duration,
}

impl Config {
    /// Creates a new configuration using the provided step spacing.
    #[must_use]
    pub const fn new(tick_interval: Duration) -> Self {
        Self { tick_interval }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

/// Pure system that emits [`Command::Simulate`] on a fixed real-time cadence.
///
/// The remaining budget starts at zero so the very first frame steps. Each
/// frame subtracts its elapsed time; once the budget is exhausted one step is
/// emitted and the budget resets to the full interval. Frames never trigger
/// more than one step.
#[derive(Debug)]
pub struct Scheduler {
    tick_interval: Duration,
    remaining: Duration,
    halted: bool,
}

impl Scheduler {
    /// Creates a new scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tick_interval: config.tick_interval,
            remaining: Duration::ZERO,
            halted: false,
        }
    }

    /// Consumes world events and emits a step command when one is due.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let mut frame_observed = false;
        let mut elapsed = Duration::ZERO;

        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    frame_observed = true;
                    elapsed = elapsed.saturating_add(*dt);
                }
                Event::CityAbandoned => self.halted = true,
                _ => {}
            }
        }

        if self.halted || !frame_observed {
            return;
        }

        self.remaining = self.remaining.saturating_sub(elapsed);
        if self.remaining.is_zero() {
            out.push(Command::Simulate);
            self.remaining = self.tick_interval;
        }
    }

    /// Reports whether the city emptied and stepping stopped for good.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Time left until the next step fires.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(dt: Duration) -> Event {
        Event::TimeAdvanced { dt }
    }

    #[test]
    fn first_frame_always_steps() {
        let mut scheduler = Scheduler::new(Config::default());
        let mut commands = Vec::new();

        scheduler.handle(&[frame(Duration::ZERO)], &mut commands);

        assert_eq!(commands, vec![Command::Simulate]);
        assert_eq!(scheduler.remaining(), DEFAULT_TICK_INTERVAL);
    }

    #[test]
    fn no_frame_means_no_step() {
        let mut scheduler = Scheduler::new(Config::default());
        let mut commands = Vec::new();

        scheduler.handle(&[], &mut commands);

        assert!(commands.is_empty());
    }
}
