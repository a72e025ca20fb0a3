use std::io;

use super::Reporter;
use crate::group::{Group, MetricReading};
use crate::metrics::Reading;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMetric {
    pub name: String,
    /// `None` when the read failed.
    pub value: Option<Reading>,
    pub emphasized: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedReport {
    pub tag: String,
    pub step_idx: u64,
    pub elapsed_secs: f64,
    pub metrics: Vec<RecordedMetric>,
}

/// Keeps every report in memory instead of printing it.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub groups: Vec<String>,
    pub reports: Vec<RecordedReport>,
    pub infos: Vec<(String, String)>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&RecordedReport> {
        self.reports.last()
    }
}

impl Reporter for RecordingReporter {
    fn add_group(&mut self, group: &Group) {
        self.groups.push(group.tag().to_string());
    }

    fn display(&mut self, tag: &str, metrics: &[MetricReading], step_idx: u64, elapsed_secs: f64) -> io::Result<()> {
        self.reports.push(RecordedReport {
            tag: tag.to_string(),
            step_idx,
            elapsed_secs,
            metrics: metrics
                .iter()
                .map(|m| RecordedMetric {
                    name: m.name.clone(),
                    value: m.value.as_ref().ok().cloned(),
                    emphasized: m.emphasized,
                })
                .collect(),
        });
        Ok(())
    }

    fn info(&mut self, tag: &str, info: &str) -> io::Result<()> {
        self.infos.push((tag.to_string(), info.to_string()));
        Ok(())
    }
}
