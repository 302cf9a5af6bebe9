//! Error types for the correction engine
//!
//! Every failure is raised where it is detected and propagated unchanged.
//! The engine never substitutes a default (e.g. a zero rate) for missing data.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::index::IndexName;
use crate::period::Period;

/// A rate lookup for an (index, period) pair with no published entry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no {index} rate published for period {period}")]
pub struct RateNotFound {
    pub index: IndexName,
    pub period: Period,
}

/// Errors returned by the correction calculator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrectionError {
    /// Principal is zero, negative or not representable as a finite decimal
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Target precedes origin
    #[error("invalid date range: target {target} precedes origin {origin}")]
    InvalidDateRange { origin: NaiveDate, target: NaiveDate },

    /// A date could not be parsed
    #[error("invalid date: {0:?}")]
    MalformedDate(String),

    /// A period in the decomposed range has no published rate
    #[error("correction unavailable: no {index} rate published for period {period}")]
    CorrectionUnavailable { index: IndexName, period: Period },

    /// Index name outside the registered set
    #[error("unknown index: {0:?}")]
    UnknownIndex(String),

    /// Decimal overflow while compounding
    #[error("arithmetic overflow while applying {index} for period {period}")]
    Arithmetic { index: IndexName, period: Period },
}

impl From<RateNotFound> for CorrectionError {
    fn from(err: RateNotFound) -> Self {
        CorrectionError::CorrectionUnavailable {
            index: err.index,
            period: err.period,
        }
    }
}

/// Coarse classification of a [`CorrectionError`] for the calling layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidAmount,
    InvalidDateRange,
    CorrectionUnavailable,
    UnknownIndex,
    Arithmetic,
}

impl CorrectionError {
    pub fn invalid_amount(amount: Decimal) -> Self {
        CorrectionError::InvalidAmount(format!("principal must be positive, got {}", amount))
    }

    /// Error kind, malformed dates are reported as an invalid range
    pub fn kind(&self) -> ErrorKind {
        match self {
            CorrectionError::InvalidAmount(_) => ErrorKind::InvalidAmount,
            CorrectionError::InvalidDateRange { .. } | CorrectionError::MalformedDate(_) => {
                ErrorKind::InvalidDateRange
            }
            CorrectionError::CorrectionUnavailable { .. } => ErrorKind::CorrectionUnavailable,
            CorrectionError::UnknownIndex(_) => ErrorKind::UnknownIndex,
            CorrectionError::Arithmetic { .. } => ErrorKind::Arithmetic,
        }
    }

    /// The missing period, if this is a [`CorrectionError::CorrectionUnavailable`]
    pub fn missing_period(&self) -> Option<Period> {
        match self {
            CorrectionError::CorrectionUnavailable { period, .. } => Some(*period),
            _ => None,
        }
    }

    /// Message suitable for end users
    ///
    /// Names the missing publication or the offending input, nothing else.
    pub fn user_message(&self) -> String {
        match self {
            CorrectionError::InvalidAmount(_) => "The amount to correct must be greater than zero.".to_string(),
            CorrectionError::InvalidDateRange { .. } => {
                "The target date must not be earlier than the origin date.".to_string()
            }
            CorrectionError::MalformedDate(_) => "One of the dates is not a valid calendar date.".to_string(),
            CorrectionError::CorrectionUnavailable { index, period } => format!(
                "The {} rate for {} has not been published yet; the correction cannot be computed.",
                index, period
            ),
            CorrectionError::UnknownIndex(_) => "The requested index is not supported.".to_string(),
            CorrectionError::Arithmetic { .. } => "The corrected value is too large to compute.".to_string(),
        }
    }
}

/// Crate result alias
pub type Result<T> = std::result::Result<T, CorrectionError>;

/// Errors raised while building or loading a rate table
#[derive(Debug, Error)]
pub enum RateTableError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("{index} publishes {expected} rates, got period {period}")]
    GranularityMismatch {
        index: IndexName,
        expected: &'static str,
        period: Period,
    },

    #[error("duplicate rate for {index} period {period}")]
    Duplicate { index: IndexName, period: Period },

    #[error("rate {rate}% for {index} period {period} would zero or negate the value")]
    RateOutOfRange {
        index: IndexName,
        period: Period,
        rate: Decimal,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_not_found_converts_with_period() {
        let err: CorrectionError = RateNotFound {
            index: IndexName::IpcaE,
            period: Period::month(2023, 3).unwrap(),
        }
        .into();

        assert_eq!(err.kind(), ErrorKind::CorrectionUnavailable);
        assert_eq!(err.missing_period(), Period::month(2023, 3));
        assert!(err.to_string().contains("2023-03"));
        assert!(err.user_message().contains("IPCA_E"));
    }

    #[test]
    fn test_malformed_date_is_date_range_kind() {
        let err = CorrectionError::MalformedDate("2023-02-30".to_string());
        assert_eq!(err.kind(), ErrorKind::InvalidDateRange);
        assert!(!err.user_message().contains("2023-02-30"));
    }
}
