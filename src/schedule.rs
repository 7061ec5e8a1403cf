//! Tick scheduling for drift and evaluation.
//!
//! Both timers are polled from a single loop, so a drift step and an
//! evaluation never interleave. With [`Timing::Independent`] the two periods
//! run free of each other (one drift may be observed by zero, one or several
//! evaluations). [`Timing::Coupled`] evaluates right after every drift and
//! ignores the evaluation period.

use std::time::{Duration, Instant};

use crate::alert::Surface;
use crate::config::Settings;
use crate::session::Session;

/// Step used when simulating time without sleeping.
const SIMULATION_STEP: Duration = Duration::from_millis(10);

/// How drift and evaluation ticks relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timing {
    /// Two free-running periods.
    #[default]
    Independent,
    /// One tick drives drift then evaluation.
    Coupled,
}

/// A fixed-period timer that is polled rather than awaited.
///
/// Missed periods are skipped, not replayed, so a stalled loop catches up
/// with a single firing.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    /// Create a ticker whose first firing is one period after `start`.
    pub fn new(period: Duration, start: Instant) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            period,
            next: start + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns `true` if the ticker fired at or before `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        while self.next <= now {
            self.next += self.period;
        }
        true
    }

    /// Time left until the next firing.
    pub fn until_next(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }
}

/// Which steps are due on this poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Due {
    pub drift: bool,
    pub evaluate: bool,
}

impl Due {
    pub fn any(&self) -> bool {
        self.drift || self.evaluate
    }
}

/// Drives the drift and evaluation tickers.
#[derive(Debug, Clone)]
pub struct Scheduler {
    timing: Timing,
    drift: Ticker,
    evaluate: Ticker,
}

impl Scheduler {
    pub fn new(
        drift_period: Duration,
        evaluate_period: Duration,
        timing: Timing,
        start: Instant,
    ) -> Self {
        Self {
            timing,
            drift: Ticker::new(drift_period, start),
            evaluate: Ticker::new(evaluate_period, start),
        }
    }

    pub fn from_settings(settings: &Settings, start: Instant) -> Self {
        Self::new(
            settings.drift_interval,
            settings.evaluate_interval,
            settings.timing(),
            start,
        )
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Check both tickers at `now`.
    pub fn poll(&mut self, now: Instant) -> Due {
        let drift = self.drift.fire(now);
        let evaluate = match self.timing {
            Timing::Independent => self.evaluate.fire(now),
            Timing::Coupled => drift,
        };
        Due { drift, evaluate }
    }

    /// Time left until the next tick of any kind.
    pub fn until_next(&self, now: Instant) -> Duration {
        match self.timing {
            Timing::Independent => self.drift.until_next(now).min(self.evaluate.until_next(now)),
            Timing::Coupled => self.drift.until_next(now),
        }
    }
}

/// Counts of ticks run by [`simulate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickCounts {
    pub drifts: u64,
    pub evaluations: u64,
}

/// Run a session over `span` of virtual time without sleeping.
///
/// Siren voices are stamped with virtual time, so take the final state with
/// `snapshot_at(start + span)`.
pub fn simulate<S: Surface>(
    session: &mut Session<S>,
    scheduler: &mut Scheduler,
    start: Instant,
    span: Duration,
) -> TickCounts {
    let mut counts = TickCounts::default();
    let mut elapsed = Duration::ZERO;

    while elapsed < span {
        elapsed = (elapsed + SIMULATION_STEP).min(span);
        let now = start + elapsed;
        let due = scheduler.poll(now);
        if due.drift {
            counts.drifts += 1;
        }
        if due.evaluate {
            counts.evaluations += 1;
        }
        session.advance_at(due, now);
    }

    counts
}
