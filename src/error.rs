//! Typed errors for ingestion and filter construction.

use std::io;

use thiserror::Error;

/// Failures while turning a trip CSV into a [`crate::trip::Dataset`].
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("line {line}: invalid timestamp '{value}' in '{column}'")]
    Timestamp {
        line: u64,
        column: &'static str,
        value: String,
    },
    #[error("line {line}: invalid number '{value}' in '{column}'")]
    Number {
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// Failures while building a [`crate::filter::TimeFilter`] or applying one
/// to a statistic that cannot be scoped by it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("'{0}' is not one of January, February, March, April, May or June")]
    UnsupportedMonth(String),
    #[error("{day} is not a valid day in {month}, {year}")]
    InvalidDay {
        day: u32,
        month: &'static str,
        year: i32,
    },
    #[error("{statistic} cannot be computed under filter '{filter}'")]
    Unsupported {
        statistic: &'static str,
        filter: String,
    },
}
