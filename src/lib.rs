pub mod console;
pub mod error;
pub mod group;
pub mod history;
pub mod logger;
pub mod metrics;

// Re-export the types a training loop touches directly
pub use console::{ConsoleReporter, DisplayHints, RecordingReporter, Reporter};
pub use error::{LoggerError, Result};
pub use group::{Group, GroupRegistry, MetricReading};
pub use history::{History, HistoryEntry, HistoryStore, InMemoryHistoryStore, JsonHistoryStore, Snapshot};
pub use logger::{EmitReport, Logger, LoggerConfig};
pub use metrics::{Accumulator, AccumulatorKind, RateResetPolicy, Reading, Update};
