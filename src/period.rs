//! Index periods and decomposition of date intervals into periods
//!
//! A period is the unit over which an index publishes a single rate: a
//! calendar month for most indices, a calendar day for daily series. Daily
//! decomposition walks every calendar day; there is no business-day calendar.
//!
//! Decomposition of `[origin, target]` is controlled by [`PeriodInclusion`]:
//!
//! - `FromFollowingPeriod` (default): the origin period is excluded and the
//!   target period is included. Correction runs "from the following month".
//!   An interval inside a single period therefore yields no periods.
//! - `FromOriginPeriod`: both the origin and target periods are included.
//!
//! In both policies `origin == target` yields no periods, so a zero-length
//! interval always corrects by a factor of exactly one.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CorrectionError;
use crate::index::Granularity;

/// Elementary publication period of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Period {
    Month { year: i32, month: u32 },
    Day(NaiveDate),
}

impl Period {
    /// Calendar month period, `None` if `month` is not in 1..=12
    pub fn month(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Period::Month { year, month })
    }

    pub fn day(date: NaiveDate) -> Self {
        Period::Day(date)
    }

    /// Period of the given granularity containing `date`
    pub fn containing(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Monthly => Period::Month {
                year: date.year(),
                month: date.month(),
            },
            Granularity::Daily => Period::Day(date),
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            Period::Month { .. } => Granularity::Monthly,
            Period::Day(_) => Granularity::Daily,
        }
    }

    /// First calendar day covered by the period
    pub fn first_day(&self) -> Option<NaiveDate> {
        match *self {
            Period::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1),
            Period::Day(date) => Some(date),
        }
    }

    /// The period immediately after this one
    pub fn next(&self) -> Option<Self> {
        match *self {
            Period::Month { year, month: 12 } => Some(Period::Month { year: year.checked_add(1)?, month: 1 }),
            Period::Month { year, month } => Some(Period::Month { year, month: month + 1 }),
            Period::Day(date) => date.succ_opt().map(Period::Day),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            Period::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    /// Parses `YYYY-MM` as a month and `YYYY-MM-DD` as a day
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parts: Vec<&str> = s.split('-').collect();
        match parts.as_slice() {
            [year, month] => {
                let year: i32 = year.parse().map_err(|_| format!("invalid year in period {:?}", s))?;
                let month: u32 = month.parse().map_err(|_| format!("invalid month in period {:?}", s))?;
                Period::month(year, month).ok_or_else(|| format!("month out of range in period {:?}", s))
            }
            [_, _, _] => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Period::Day)
                .map_err(|_| format!("invalid date in period {:?}", s)),
            _ => Err(format!("period {:?} is neither YYYY-MM nor YYYY-MM-DD", s)),
        }
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

impl TryFrom<String> for Period {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Which edge periods of an interval take part in the correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PeriodInclusion {
    /// Origin period excluded, target period included
    #[default]
    FromFollowingPeriod,
    /// Origin and target periods both included
    FromOriginPeriod,
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate, CorrectionError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| CorrectionError::MalformedDate(s.to_string()))
}

/// Iterator over consecutive periods, `end` inclusive
#[derive(Debug, Clone)]
pub struct Periods {
    next: Option<Period>,
    end: Period,
}

impl Iterator for Periods {
    type Item = Period;

    fn next(&mut self) -> Option<Period> {
        let current = self.next.filter(|p| *p <= self.end)?;
        self.next = current.next();
        Some(current)
    }
}

/// Lazily walk the periods covering `[origin, target]`
///
/// Fails with `InvalidDateRange` when `origin > target`.
pub fn periods_between(
    origin: NaiveDate,
    target: NaiveDate,
    granularity: Granularity,
    inclusion: PeriodInclusion,
) -> Result<Periods, CorrectionError> {
    if origin > target {
        return Err(CorrectionError::InvalidDateRange { origin, target });
    }

    let end = Period::containing(target, granularity);
    let first = Period::containing(origin, granularity);
    let start = if origin == target {
        None
    } else {
        match inclusion {
            PeriodInclusion::FromFollowingPeriod => first.next(),
            PeriodInclusion::FromOriginPeriod => Some(first),
        }
    };

    Ok(Periods { next: start, end })
}

/// Decompose `[origin, target]` into the ordered periods it covers
pub fn decompose(
    origin: NaiveDate,
    target: NaiveDate,
    granularity: Granularity,
    inclusion: PeriodInclusion,
) -> Result<Vec<Period>, CorrectionError> {
    Ok(periods_between(origin, target, granularity, inclusion)?.collect())
}
