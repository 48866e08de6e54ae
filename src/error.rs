//! Error types shared across the configuration build, bulk framing and
//! query pipeline.

/// Failures while compiling load-time configuration (synonym lists).
///
/// Any of these aborts the configuration build; the process must not start
/// serving traffic after one.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A synonym record that cannot be interpreted as a (key, term) pair.
    #[error("malformed synonym record on line {line}: {reason}")]
    Format { line: u64, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub fn format(line: u64, reason: impl Into<String>) -> Self {
        ConfigError::Format {
            line,
            reason: reason.into(),
        }
    }
}

/// Failures while turning corpus records into bulk operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The record at `position` has no usable identifier in `field`.
    #[error("record {position} has no usable identifier field `{field}`")]
    SchemaMismatch { position: usize, field: String },

    /// The corpus document is not an array of objects.
    #[error("corpus is not a JSON array of objects: {0}")]
    CorpusShape(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the per-query pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Nothing left to search for once the category prefix was removed.
    #[error("empty query")]
    EmptyQuery,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Failures talking to the remote search engine.
///
/// Only transport-level problems end up here. Error responses produced by the
/// engine itself are relayed to the caller untouched.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid engine URL `{0}`")]
    Url(String),

    #[error("engine request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
