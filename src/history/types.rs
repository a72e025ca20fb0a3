use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::metrics::Reading;

/// Bumped whenever the on-disk layout changes.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub step_idx: u64,
    /// Seconds since the logger started.
    pub time_idx: f64,
    pub value: Reading,
}

/// A point-in-time reading of one group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub step_idx: u64,
    pub time_idx: f64,
    /// Every metric the group currently tracks, read successfully or not.
    pub series: Vec<String>,
    pub values: Vec<(String, Reading)>,
}

impl Snapshot {
    pub fn new(step_idx: u64, time_idx: f64) -> Self {
        Self { step_idx, time_idx, ..Self::default() }
    }

    /// Adds a tracked metric with no value for this step.
    pub fn with_series(mut self, name: impl Into<String>) -> Self {
        self.series.push(name.into());
        self
    }

    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Reading>) -> Self {
        let name = name.into();
        self.series.push(name.clone());
        self.values.push((name, value.into()));
        self
    }
}

/// Full persisted history of one group: metric name to its entries in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub version: u32,
    pub tag: String,
    pub series: BTreeMap<String, Vec<HistoryEntry>>,
}

impl History {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            version: FORMAT_VERSION,
            tag: tag.into(),
            series: BTreeMap::new(),
        }
    }

    /// Merges a snapshot. Series unknown to the snapshot are left alone and
    /// series new to the history start empty before the append.
    pub fn merge(&mut self, snapshot: &Snapshot) {
        for name in &snapshot.series {
            self.series.entry(name.clone()).or_default();
        }
        for (name, value) in &snapshot.values {
            self.series.entry(name.clone()).or_default().push(HistoryEntry {
                step_idx: snapshot.step_idx,
                time_idx: snapshot.time_idx,
                value: value.clone(),
            });
        }
    }

    pub fn get(&self, name: &str) -> Option<&[HistoryEntry]> {
        self.series.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}
