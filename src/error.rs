use chrono::NaiveDate;
use thiserror::Error;

/// Failures raised by the projection, ledger and date helpers.
///
/// These are raised before any result is produced; callers decide how to
/// surface them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum CoreError {
    /// Invalid numeric input: non-positive divisor, bad month index,
    /// inverted date range.
    #[error("invalid parameter: {0}")]
    Domain(String),
    #[error("contribution '{description}' references unknown participant {participant}")]
    Reference { description: String, participant: i64 },
    #[error("contribution '{description}' dated {date} falls outside the plan ({start} to {end})")]
    Range {
        description: String,
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl CoreError {
    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }
}

pub(crate) type CoreResult<T> = std::result::Result<T, CoreError>;
