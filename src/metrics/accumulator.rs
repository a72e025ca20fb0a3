use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use super::reading::Reading;
use crate::error::{LoggerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccumulatorKind {
    Max,
    Sum,
    Average,
    EpisodicAverage,
    Rate,
    RawLog,
}

impl AccumulatorKind {
    /// Only the averaging kinds accept an observation count with their value.
    pub fn accepts_count(self) -> bool {
        matches!(self, AccumulatorKind::Average | AccumulatorKind::EpisodicAverage)
    }
}

/// What `reset` does to the time baseline of a `Rate` accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RateResetPolicy {
    /// Clear the total and restart the clock, so the next window measures only itself.
    #[default]
    Restart,
    /// Clear the total but keep the creation timestamp as the denominator's origin.
    KeepBaseline,
}

/// One observation handed to an accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Update {
    Value(f64),
    /// A value standing for `count` observations. For `EpisodicAverage` a
    /// count of zero parks the value until the episode closes.
    Weighted { value: f64, count: u64 },
}

impl From<f64> for Update {
    fn from(v: f64) -> Self {
        Update::Value(v)
    }
}

impl From<(f64, u64)> for Update {
    fn from((value, count): (f64, u64)) -> Self {
        Update::Weighted { value, count }
    }
}

#[derive(Debug, Clone)]
enum State {
    Max(f64),
    Sum(f64),
    Average { total: f64, count: u64 },
    EpisodicAverage { total: f64, count: u64, partial: f64 },
    Rate { total: f64, started: Instant, policy: RateResetPolicy },
    RawLog(Vec<f64>),
}

impl State {
    fn initial(kind: AccumulatorKind) -> Self {
        match kind {
            AccumulatorKind::Max => State::Max(f64::NEG_INFINITY),
            AccumulatorKind::Sum => State::Sum(0.0),
            AccumulatorKind::Average => State::Average { total: 0.0, count: 0 },
            AccumulatorKind::EpisodicAverage => State::EpisodicAverage { total: 0.0, count: 0, partial: 0.0 },
            AccumulatorKind::Rate => State::Rate {
                total: 0.0,
                started: Instant::now(),
                policy: RateResetPolicy::default(),
            },
            AccumulatorKind::RawLog => State::RawLog(Vec::new()),
        }
    }

    fn kind(&self) -> AccumulatorKind {
        match self {
            State::Max(_) => AccumulatorKind::Max,
            State::Sum(_) => AccumulatorKind::Sum,
            State::Average { .. } => AccumulatorKind::Average,
            State::EpisodicAverage { .. } => AccumulatorKind::EpisodicAverage,
            State::Rate { .. } => AccumulatorKind::Rate,
            State::RawLog(_) => AccumulatorKind::RawLog,
        }
    }
}

/// A single named statistic.
///
/// State changes only through `update` and `reset`; `get` is a pure read.
#[derive(Debug, Clone)]
pub struct Accumulator {
    name: String,
    resettable: bool,
    emphasized: bool,
    state: State,
}

impl Accumulator {
    /// Fails with `InvalidConfiguration` when `name` is empty or blank.
    pub fn new(kind: AccumulatorKind, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration(format!(
                "{:?} metric must be named",
                kind
            )));
        }
        Ok(Self {
            name,
            resettable: true,
            emphasized: false,
            state: State::initial(kind),
        })
    }

    pub fn max(name: impl Into<String>) -> Result<Self> {
        Self::new(AccumulatorKind::Max, name)
    }

    pub fn sum(name: impl Into<String>) -> Result<Self> {
        Self::new(AccumulatorKind::Sum, name)
    }

    pub fn average(name: impl Into<String>) -> Result<Self> {
        Self::new(AccumulatorKind::Average, name)
    }

    pub fn episodic_average(name: impl Into<String>) -> Result<Self> {
        Self::new(AccumulatorKind::EpisodicAverage, name)
    }

    pub fn rate(name: impl Into<String>) -> Result<Self> {
        Self::new(AccumulatorKind::Rate, name)
    }

    pub fn raw_log(name: impl Into<String>) -> Result<Self> {
        Self::new(AccumulatorKind::RawLog, name)
    }

    /// Makes `reset` a no-op for this accumulator.
    pub fn non_resettable(mut self) -> Self {
        self.resettable = false;
        self
    }

    pub fn emphasized(mut self) -> Self {
        self.emphasized = true;
        self
    }

    /// Sets the reset policy of a `Rate` accumulator. Other kinds ignore it.
    pub fn with_rate_reset(mut self, policy: RateResetPolicy) -> Self {
        if let State::Rate { policy: p, .. } = &mut self.state {
            *p = policy;
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AccumulatorKind {
        self.state.kind()
    }

    pub fn is_resettable(&self) -> bool {
        self.resettable
    }

    pub fn is_emphasized(&self) -> bool {
        self.emphasized
    }

    /// Clock origin of a `Rate` accumulator.
    pub fn started_at(&self) -> Option<Instant> {
        match self.state {
            State::Rate { started, .. } => Some(started),
            _ => None,
        }
    }

    /// Rejects an update this accumulator cannot take, without touching state.
    pub fn check(&self, update: &Update) -> Result<()> {
        if let Update::Weighted { .. } = update {
            if !self.kind().accepts_count() {
                return Err(LoggerError::InvalidUpdate {
                    name: self.name.clone(),
                    reason: format!("{:?} does not take an observation count", self.kind()),
                });
            }
        }
        Ok(())
    }

    pub fn update(&mut self, update: impl Into<Update>) -> Result<()> {
        let update = update.into();
        self.check(&update)?;
        self.apply(update);
        Ok(())
    }

    // Caller must have passed `check` first.
    pub(crate) fn apply(&mut self, update: Update) {
        let (value, n) = match update {
            Update::Value(v) => (v, 1),
            Update::Weighted { value, count } => (value, count),
        };

        match &mut self.state {
            State::Max(m) => *m = m.max(value),
            State::Sum(s) => *s += value,
            State::Average { total, count } => {
                *total += value;
                *count += n;
            }
            State::EpisodicAverage { total, count, partial } => {
                if n == 0 {
                    *partial += value;
                } else {
                    *total += *partial + value;
                    *count += n;
                    *partial = 0.0;
                }
            }
            State::Rate { total, .. } => *total += value,
            State::RawLog(values) => values.push(value),
        }
    }

    pub fn get(&self) -> Result<Reading> {
        self.get_at(Instant::now())
    }

    /// Reads the accumulator as of `now`. Only `Rate` depends on the clock.
    pub fn get_at(&self, now: Instant) -> Result<Reading> {
        let value = match &self.state {
            State::Max(m) => *m,
            State::Sum(s) => *s,
            State::Average { total, count } | State::EpisodicAverage { total, count, .. } => {
                if *count == 0 {
                    return Err(self.division_by_zero());
                }
                *total / *count as f64
            }
            State::Rate { total, started, .. } => {
                let elapsed = now.saturating_duration_since(*started).as_secs_f64();
                if elapsed == 0.0 {
                    return Err(self.division_by_zero());
                }
                *total / elapsed
            }
            State::RawLog(values) => return Ok(Reading::Series(values.clone())),
        };
        Ok(Reading::Scalar(value))
    }

    pub fn reset(&mut self) {
        if !self.resettable {
            return;
        }
        self.state = match self.state {
            State::Rate { started, policy, .. } => State::Rate {
                total: 0.0,
                started: match policy {
                    RateResetPolicy::Restart => Instant::now(),
                    RateResetPolicy::KeepBaseline => started,
                },
                policy,
            },
            ref other => State::initial(other.kind()),
        };
    }

    fn division_by_zero(&self) -> LoggerError {
        LoggerError::DivisionByZero { name: self.name.clone() }
    }
}

impl fmt::Display for Accumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}::{}", self.kind(), self.name)
    }
}
