//! Rate table lookup
//!
//! Resolves an (index, period) pair to the rate the index published for that
//! period. A missing entry is an explicit [`RateNotFound`], never a zero rate.

mod loader;
mod shared;

pub use loader::{load_rates, load_rates_from_reader, rates_path_from_env, DEFAULT_RATES_PATH, RATES_PATH_ENV};
pub use shared::SharedRateTable;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{RateNotFound, RateTableError};
use crate::index::IndexName;
use crate::period::Period;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// A published rate for one period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateEntry {
    pub index: IndexName,
    pub period: Period,
    /// Variation over the period in percent (0.50 = 0.50 %)
    pub rate: Decimal,
}

impl RateEntry {
    /// Growth factor over the period, `1 + rate / 100`
    pub fn factor(&self) -> Decimal {
        Decimal::ONE + self.rate / ONE_HUNDRED
    }
}

/// Read-only source of published rates
///
/// Implementations must return the same entry for the same key for as long
/// as a calculation holds a reference to them.
pub trait RateLookup: Send + Sync {
    fn lookup(&self, index: IndexName, period: Period) -> Result<RateEntry, RateNotFound>;
}

impl<T: RateLookup + ?Sized> RateLookup for Arc<T> {
    fn lookup(&self, index: IndexName, period: Period) -> Result<RateEntry, RateNotFound> {
        (**self).lookup(index, period)
    }
}

impl<T: RateLookup + ?Sized> RateLookup for &T {
    fn lookup(&self, index: IndexName, period: Period) -> Result<RateEntry, RateNotFound> {
        (**self).lookup(index, period)
    }
}

/// In-memory rate table keyed by index and period
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    entries: BTreeMap<(IndexName, Period), Decimal>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(index, period, rate)` triples
    pub fn from_entries<I>(entries: I) -> Result<Self, RateTableError>
    where
        I: IntoIterator<Item = (IndexName, Period, Decimal)>,
    {
        let mut table = Self::new();
        for (index, period, rate) in entries {
            table.insert(index, period, rate)?;
        }
        Ok(table)
    }

    /// Add a published rate
    ///
    /// Rejects periods of the wrong granularity for the index, duplicates,
    /// and rates at or below -100 %.
    pub fn insert(&mut self, index: IndexName, period: Period, rate: Decimal) -> Result<(), RateTableError> {
        let expected = index.granularity();
        if period.granularity() != expected {
            return Err(RateTableError::GranularityMismatch {
                index,
                expected: expected.as_str(),
                period,
            });
        }

        if rate <= -ONE_HUNDRED {
            return Err(RateTableError::RateOutOfRange { index, period, rate });
        }

        if self.entries.contains_key(&(index, period)) {
            return Err(RateTableError::Duplicate { index, period });
        }

        self.entries.insert((index, period), rate);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries for an index, in period order
    pub fn entries_for(&self, index: IndexName) -> impl Iterator<Item = RateEntry> + '_ {
        self.entries
            .iter()
            .filter(move |((i, _), _)| *i == index)
            .map(|(&(index, period), &rate)| RateEntry { index, period, rate })
    }

    /// Most recent published period for an index
    pub fn latest_period(&self, index: IndexName) -> Option<Period> {
        self.entries_for(index).last().map(|entry| entry.period)
    }
}

impl RateLookup for RateTable {
    fn lookup(&self, index: IndexName, period: Period) -> Result<RateEntry, RateNotFound> {
        self.entries
            .get(&(index, period))
            .map(|&rate| RateEntry { index, period, rate })
            .ok_or(RateNotFound { index, period })
    }
}
