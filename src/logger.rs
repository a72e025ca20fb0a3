use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::console::{ConsoleReporter, DisplayHints, Reporter, DEFAULT_CONSOLE_WIDTH};
use crate::error::{LoggerError, Result};
use crate::group::{Group, GroupRegistry};
use crate::history::{HistoryStore, JsonHistoryStore, Snapshot};
use crate::metrics::Accumulator;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub label: String,
    /// Run directory. Defaults to `<cwd>/<label>`.
    pub path: Option<PathBuf>,
    pub console_width: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            label: "Logger".to_string(),
            path: None,
            console_width: DEFAULT_CONSOLE_WIDTH,
        }
    }
}

impl LoggerConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_console_width(mut self, width: usize) -> Self {
        self.console_width = width;
        self
    }

    fn resolve_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(std::env::current_dir()?.join(&self.label)),
        }
    }
}

/// Outcome of one `emit`.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitReport {
    pub step_idx: u64,
    pub time_idx: f64,
    /// Metrics whose read failed; they were shown as `n/a` and not persisted this cycle.
    pub failed: Vec<String>,
}

/// Owns the run directory, the group registry, the console and the history store.
///
/// Groups are handed back to the caller, who updates them in the inner loop and
/// passes them to `emit` at reporting time.
pub struct Logger<R: Reporter = ConsoleReporter, S: HistoryStore = JsonHistoryStore> {
    label: String,
    path: PathBuf,
    registry: GroupRegistry,
    reporter: R,
    store: S,
    started: Instant,
}

impl Logger {
    /// Console output on stdout, JSON history files in the run directory.
    pub fn create(label: impl Into<String>, path: Option<PathBuf>) -> Result<Self> {
        let mut config = LoggerConfig::new(label);
        config.path = path;
        Self::from_config(config)
    }

    pub fn from_config(config: LoggerConfig) -> Result<Self> {
        let path = config.resolve_path()?;
        let reporter = ConsoleReporter::stdout(config.console_width);
        let store = JsonHistoryStore::new(&path);
        Self::with_parts(config, reporter, store)
    }
}

impl<R: Reporter, S: HistoryStore> Logger<R, S> {
    /// Creates (or reuses) the run directory.
    pub fn with_parts(config: LoggerConfig, reporter: R, store: S) -> Result<Self> {
        let path = config.resolve_path()?;
        if path.exists() {
            warn!(path = %path.display(), "run directory exists, results may be overwritten");
        } else {
            info!(path = %path.display(), "creating run directory");
        }
        fs::create_dir_all(&path)?;

        Ok(Self {
            label: config.label,
            path,
            registry: GroupRegistry::new(),
            reporter,
            store,
            started: Instant::now(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    /// Seconds since the logger was created.
    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Registers a new group. A missing tag is replaced by `groupNN`.
    ///
    /// Fails with `DuplicateGroupTag` or `DuplicateMetricName`; on failure the
    /// registry is left as it was.
    pub fn add_group(
        &mut self,
        tag: Option<&str>,
        metrics: impl IntoIterator<Item = Accumulator>,
        hints: DisplayHints,
    ) -> Result<Group> {
        let tag = self.registry.resolve_tag(tag);
        if self.registry.is_taken(&tag) {
            return Err(LoggerError::DuplicateGroupTag(tag));
        }
        let group = Group::new(tag, metrics, hints)?;
        self.registry.register(group.tag())?;
        self.reporter.add_group(&group);

        info!(tag = group.tag(), metrics = group.len(), "group added");
        Ok(group)
    }

    /// Unregisters a group, freeing its tag.
    pub fn release_group(&mut self, group: Group) -> Result<()> {
        if !self.registry.release(group.tag()) {
            return Err(LoggerError::UnknownGroup(group.tag().to_string()));
        }
        Ok(())
    }

    /// Reports the group's current values and appends them to its history.
    ///
    /// A metric that cannot be read is shown as `n/a` and skipped in the
    /// history for this step; the rest of the group is still reported.
    /// History I/O failures are returned.
    pub fn emit(&mut self, group: &Group, step_idx: u64) -> Result<EmitReport> {
        let tag = group.tag();
        if !self.registry.contains(tag) {
            return Err(LoggerError::UnknownGroup(tag.to_string()));
        }

        let now = Instant::now();
        let time_idx = now.saturating_duration_since(self.started).as_secs_f64();
        let readings = group.snapshot_at(now);

        if let Err(e) = self.reporter.display(tag, &readings, step_idx, time_idx) {
            warn!(tag, error = %e, "console report failed");
        }

        let mut snapshot = Snapshot::new(step_idx, time_idx);
        let mut failed = Vec::new();
        for reading in readings {
            match reading.value {
                Ok(value) => snapshot = snapshot.with_value(reading.name, value),
                Err(e) => {
                    warn!(tag, metric = %reading.name, error = %e, "metric not persisted");
                    snapshot = snapshot.with_series(reading.name.clone());
                    failed.push(reading.name);
                }
            }
        }

        self.store.append(tag, &snapshot)?;
        debug!(tag, step_idx, time_idx, "snapshot emitted");

        Ok(EmitReport { step_idx, time_idx, failed })
    }

    /// Clears the group's resettable metrics for the next reporting window.
    pub fn reset(&mut self, group: &mut Group) {
        group.reset();
    }

    pub fn log_info(&mut self, group: &Group, info: &str) -> Result<()> {
        self.reporter.info(group.tag(), info)?;
        Ok(())
    }

    /// Prints the current local date and time under the group's header.
    pub fn log_time(&mut self, group: &Group) -> Result<()> {
        let info = format!("date: {}.", chrono::Local::now().format("%d/%m/%Y | %H:%M:%S"));
        self.log_info(group, &info)
    }
}
