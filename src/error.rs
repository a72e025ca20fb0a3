use std::path::PathBuf;

/// Errors raised while building groups, updating metrics or persisting history.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Metric `{name}` appears more than once in group `{group}`")]
    DuplicateMetricName { group: String, name: String },

    #[error("Group `{0}` already added to logger")]
    DuplicateGroupTag(String),

    #[error("Metric `{name}` is not in the `{group}` group")]
    UnknownMetric { group: String, name: String },

    #[error("Group `{0}` is not registered with this logger")]
    UnknownGroup(String),

    #[error("Invalid update for metric `{name}`: {reason}")]
    InvalidUpdate { name: String, reason: String },

    #[error("Metric `{name}` has no qualifying observations yet")]
    DivisionByZero { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt history file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("History file {path} has unsupported format version {found}")]
    UnsupportedVersion { path: PathBuf, found: u32 },
}

pub type Result<T> = std::result::Result<T, LoggerError>;
