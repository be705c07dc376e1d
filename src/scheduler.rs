//! Converts variable wall-clock time into discrete simulation steps.
//!
//! The render loop runs on its own fixed budget; this accumulator decides how
//! many snake steps each iteration owes, at a rate that tightens as the score
//! climbs.

pub const BASE_STEP_US: u64 = 120_000;
pub const MIN_STEP_US: u64 = 60_000;

/// Every this many points, the step interval shrinks by `SPEEDUP_REDUCE_US`.
pub const SPEEDUP_SCORE_STEP: u32 = 50;
pub const SPEEDUP_REDUCE_US: u64 = 10_000;

// Cells are two columns wide and one row tall, so vertical travel looks twice
// as fast per step. Stretching the vertical interval by 8/5 evens it out;
// this is presentation tuning and never feeds back into collision logic.
const VERTICAL_SCALE_NUM: u64 = 8;
const VERTICAL_SCALE_DEN: u64 = 5;

/// At most this many intervals may sit in the accumulator, so a stalled
/// process does not replay a burst of catch-up steps on resume.
const MAX_BACKLOG_INTERVALS: u64 = 3;

#[derive(Debug, Default)]
pub struct StepScheduler {
    accumulator_us: u64,
}

impl StepScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective step interval for the given score and pending heading.
    pub fn interval_us(score: u32, vertical: bool) -> u64 {
        let reduction = u64::from(score / SPEEDUP_SCORE_STEP) * SPEEDUP_REDUCE_US;
        let base = BASE_STEP_US.saturating_sub(reduction).max(MIN_STEP_US);
        if vertical {
            base * VERTICAL_SCALE_NUM / VERTICAL_SCALE_DEN
        } else {
            base
        }
    }

    pub fn accumulate(&mut self, elapsed_us: u64, interval_us: u64) {
        self.accumulator_us = (self.accumulator_us + elapsed_us)
            .min(interval_us * MAX_BACKLOG_INTERVALS);
    }

    /// Consume one interval's worth of time if enough has accumulated.
    /// Callers recompute the interval between consumptions, since the score
    /// or heading may have changed on the step just taken.
    pub fn consume(&mut self, interval_us: u64) -> bool {
        if self.accumulator_us >= interval_us {
            self.accumulator_us -= interval_us;
            true
        } else {
            false
        }
    }

    /// Drop any banked time, e.g. when resuming from pause.
    pub fn reset(&mut self) {
        self.accumulator_us = 0;
    }

    pub fn accumulator_us(&self) -> u64 {
        self.accumulator_us
    }
}
