use colored::Colorize;
use std::collections::HashMap;
use std::io::{self, Stdout, Write};

use super::hints::DisplayHints;
use super::Reporter;
use crate::group::{Group, MetricReading};
use crate::metrics::Reading;

pub const DEFAULT_CONSOLE_WIDTH: usize = 80;

#[derive(Debug, Clone)]
struct GroupMeta {
    hints: DisplayHints,
}

/// Fixed-width console rendering with dot-padded, right-justified values.
///
/// ```text
///  training  .................................     5000 steps | 0:01:12 elapsed.
///     | max_q ............................................................ 12.431.
/// ```
#[derive(Debug)]
pub struct ConsoleReporter<W: Write = Stdout> {
    out: W,
    width: usize,
    groups: HashMap<String, GroupMeta>,
}

impl ConsoleReporter<Stdout> {
    pub fn stdout(width: usize) -> Self {
        Self::new(io::stdout(), width)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, width: usize) -> Self {
        Self {
            out,
            width,
            groups: HashMap::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // `left` and `right` are measured before coloring.
    fn justify_right(&self, left: (String, usize), right: (String, usize), bold: bool) -> String {
        let dots = ".".repeat(self.width.saturating_sub(left.1 + right.1 + 3));
        let padding = if bold { dots.bold().to_string() } else { dots };
        format!("{} {} {}", left.0, padding, right.0)
    }

    fn header(&self, tag: &str) -> (String, usize) {
        let display_name = format!(" {} ", tag);
        let len = display_name.chars().count();
        let painted = match self.groups.get(tag) {
            Some(meta) => meta.hints.paint(&display_name).to_string(),
            None => display_name,
        };
        (painted, len)
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn add_group(&mut self, group: &Group) {
        self.groups.insert(
            group.tag().to_string(),
            GroupMeta { hints: group.hints().clone() },
        );
    }

    fn display(&mut self, tag: &str, metrics: &[MetricReading], step_idx: u64, elapsed_secs: f64) -> io::Result<()> {
        let x_idx = format!("{:>8} steps | {} elapsed.", step_idx, format_elapsed(elapsed_secs));
        let x_len = x_idx.chars().count();
        let line = self.justify_right(self.header(tag), (x_idx.bold().to_string(), x_len), true);
        writeln!(self.out, "{}", line)?;

        for metric in metrics {
            let label = format!("    | {}", metric.name);
            let value = match &metric.value {
                Ok(reading) => format_reading(reading),
                Err(_) => "n/a.".to_string(),
            };
            let (label_len, value_len) = (label.chars().count(), value.chars().count());
            let line = if metric.emphasized {
                self.justify_right(
                    (label.bold().to_string(), label_len),
                    (value.bold().to_string(), value_len),
                    false,
                )
            } else {
                self.justify_right((label, label_len), (value, value_len), false)
            };
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()
    }

    fn info(&mut self, tag: &str, info: &str) -> io::Result<()> {
        let line = self.justify_right(self.header(tag), (info.to_string(), info.chars().count()), false);
        writeln!(self.out, "{}", line)?;
        self.out.flush()
    }
}

/// `H:MM:SS`, or `N day(s), H:MM:SS` past 24 hours. Fractional seconds dropped.
pub fn format_elapsed(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let (days, rest) = (total / 86_400, total % 86_400);
    let clock = format!("{}:{:02}:{:02}", rest / 3600, (rest % 3600) / 60, rest % 60);
    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        n => format!("{} days, {}", n, clock),
    }
}

pub fn format_reading(reading: &Reading) -> String {
    match reading {
        Reading::Scalar(v) => format_scalar(*v),
        Reading::Series(values) => match values.last() {
            Some(last) => format!("{} values, last {}", values.len(), format_scalar(*last)),
            None => "empty.".to_string(),
        },
    }
}

fn format_scalar(v: f64) -> String {
    if v.is_finite() {
        format!("{:05.3}.", v)
    } else {
        format!("{}.", v)
    }
}
