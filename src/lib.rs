//! Monetary Correction - index-based adjustment of monetary amounts
//!
//! This library provides:
//! - Exact decimal amounts with configurable rounding
//! - A registered set of economic indices (IPCA-E, IPCA, INPC, IGP-M, SELIC, TR)
//! - Rate tables keyed by index and period, loaded from CSV
//! - Flat (single-factor) and accumulated (period-by-period) correction
//! - Application of correction outcomes to stored records

pub mod error;
pub mod money;
pub mod index;
pub mod period;
pub mod rates;
pub mod correction;
pub mod record;

// Re-export commonly used types
pub use error::{CorrectionError, ErrorKind, RateNotFound, RateTableError};
pub use money::{MonetaryAmount, RoundingMode};
pub use index::{IndexName, Granularity};
pub use period::{Period, PeriodInclusion};
pub use rates::{RateEntry, RateLookup, RateTable, SharedRateTable};
pub use correction::{
    CorrectionCalculator, CorrectionConfig, CorrectionOutcome, CorrectionRequest, CorrectionResult, Strategy,
};
pub use record::MonetaryRecord;
