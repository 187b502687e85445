use thiserror::Error;

/// Fatal failures of an aggregation run. Any of these aborts the run with no partial output.
#[derive(Debug, Error)]
pub enum ZoneError {
    /// A required table or feature source is missing, unreadable, or malformed.
    #[error("invalid source {source_name}: {reason}")]
    InvalidSource { source_name: String, reason: String },

    /// A population value could not be converted to an integer after separator removal.
    #[error("cannot parse population {value:?} for language {code}")]
    Parse { code: String, value: String },

    /// A join precondition was violated; indicates a bug rather than bad input.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

impl ZoneError {
    pub(crate) fn invalid_source(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSource { source_name: source_name.into(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, ZoneError>;
