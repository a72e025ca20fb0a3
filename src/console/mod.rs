//! Console side of reporting. The logger only hands a reporter
//! `(name, value, emphasis)` rows plus the step and elapsed time.

pub mod hints;
pub mod recording;
pub mod reporter;

pub use hints::{Attribute, DisplayHints};
pub use recording::{RecordedMetric, RecordedReport, RecordingReporter};
pub use reporter::{format_elapsed, format_reading, ConsoleReporter, DEFAULT_CONSOLE_WIDTH};

use std::io;

use crate::group::{Group, MetricReading};

pub trait Reporter {
    /// Called once when a group is registered with the logger.
    fn add_group(&mut self, group: &Group);

    /// Renders one report. `metrics` is in the group's construction order.
    fn display(&mut self, tag: &str, metrics: &[MetricReading], step_idx: u64, elapsed_secs: f64) -> io::Result<()>;

    /// Free-form line under the group's header.
    fn info(&mut self, tag: &str, info: &str) -> io::Result<()>;
}
