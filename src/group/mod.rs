//! Named, fixed collections of accumulators that are reported together.

pub mod registry;

pub use registry::GroupRegistry;

use std::collections::HashMap;
use std::time::Instant;

use crate::console::DisplayHints;
use crate::error::{LoggerError, Result};
use crate::history::validate_tag;
use crate::metrics::{Accumulator, Reading, Update};

/// One metric's value at report time.
#[derive(Debug)]
pub struct MetricReading {
    pub name: String,
    pub value: Result<Reading>,
    pub emphasized: bool,
}

#[derive(Debug, Clone)]
pub struct Group {
    tag: String,
    // Construction order is the reporting order.
    metrics: Vec<Accumulator>,
    index: HashMap<String, usize>,
    hints: DisplayHints,
}

impl Group {
    /// Fails with `DuplicateMetricName` if two accumulators share a name, and
    /// with `InvalidConfiguration` for a blank tag or one holding `/`, `\` or `..`.
    pub fn new(
        tag: impl Into<String>,
        metrics: impl IntoIterator<Item = Accumulator>,
        hints: DisplayHints,
    ) -> Result<Self> {
        let tag = tag.into();
        validate_tag(&tag)?;

        let metrics: Vec<Accumulator> = metrics.into_iter().collect();
        let mut index = HashMap::with_capacity(metrics.len());
        for (i, metric) in metrics.iter().enumerate() {
            if index.insert(metric.name().to_string(), i).is_some() {
                return Err(LoggerError::DuplicateMetricName {
                    group: tag,
                    name: metric.name().to_string(),
                });
            }
        }

        Ok(Self { tag, metrics, index, hints })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn hints(&self) -> &DisplayHints {
        &self.hints
    }

    pub fn get(&self, name: &str) -> Option<&Accumulator> {
        self.index.get(name).map(|&i| &self.metrics[i])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(|m| m.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Accumulator> {
        self.metrics.iter()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Applies a batch of updates, all or nothing.
    ///
    /// Every key is resolved and every update checked against its accumulator
    /// before any state changes, so an `UnknownMetric` or `InvalidUpdate`
    /// leaves the whole group untouched.
    pub fn update<I, K, U>(&mut self, updates: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, U)>,
        K: AsRef<str>,
        U: Into<Update>,
    {
        let mut resolved = Vec::new();
        for (name, update) in updates {
            let name = name.as_ref();
            let &i = self.index.get(name).ok_or_else(|| LoggerError::UnknownMetric {
                group: self.tag.clone(),
                name: name.to_string(),
            })?;
            let update = update.into();
            self.metrics[i].check(&update)?;
            resolved.push((i, update));
        }

        for (i, update) in resolved {
            self.metrics[i].apply(update);
        }
        Ok(())
    }

    /// Resets every resettable member.
    pub fn reset(&mut self) {
        for metric in &mut self.metrics {
            metric.reset();
        }
    }

    pub fn snapshot(&self) -> Vec<MetricReading> {
        self.snapshot_at(Instant::now())
    }

    /// Reads every member in construction order. A failed read stays local to its metric.
    pub fn snapshot_at(&self, now: Instant) -> Vec<MetricReading> {
        self.metrics
            .iter()
            .map(|m| MetricReading {
                name: m.name().to_string(),
                value: m.get_at(now),
                emphasized: m.is_emphasized(),
            })
            .collect()
    }
}
