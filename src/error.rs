//! Error handling types and utilities.

/// A specialized Result type for application glue (config, start-up).
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Errors produced while building or querying the documentation index.
///
/// `Clone` because a single in-flight build result is handed to every caller
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FindError {
    /// The inventory could not be fetched (I/O error, bad exit status, timeout).
    /// The cache stays empty, so the next request retries.
    #[error("documentation inventory unavailable: {reason}")]
    CorpusUnavailable { reason: String },

    /// A single inventory section was malformed and has been skipped.
    #[error("malformed inventory section #{section}: {reason}")]
    ParseFailure { section: usize, reason: String },

    /// The blocking parse task did not run to completion.
    #[error("index build aborted: {reason}")]
    BuildAborted { reason: String },
}

impl FindError {
    pub(crate) fn unavailable(reason: impl Into<String>) -> Self {
        Self::CorpusUnavailable {
            reason: reason.into(),
        }
    }

    /// Whether the failure is worth retrying on the next request.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::CorpusUnavailable { .. } | Self::BuildAborted { .. })
    }
}
