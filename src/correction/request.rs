//! Correction requests as received from the calling layer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Strategy;
use crate::error::CorrectionError;
use crate::index::IndexName;
use crate::money::MonetaryAmount;
use crate::period::parse_date;

/// Inputs of one correction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionRequest {
    pub principal: MonetaryAmount,
    pub origin_date: NaiveDate,
    pub target_date: NaiveDate,
    pub index: IndexName,
    #[serde(default)]
    pub strategy: Strategy,
}

impl CorrectionRequest {
    pub fn new(
        principal: MonetaryAmount,
        origin_date: NaiveDate,
        target_date: NaiveDate,
        index: IndexName,
        strategy: Strategy,
    ) -> Self {
        Self {
            principal,
            origin_date,
            target_date,
            index,
            strategy,
        }
    }

    /// Validate raw text inputs at the boundary
    ///
    /// Malformed amounts, dates and unknown index names are rejected here with
    /// their specific error kind; nothing is defaulted.
    pub fn parse(
        principal: &str,
        origin_date: &str,
        target_date: &str,
        index: &str,
        strategy: Strategy,
    ) -> Result<Self, CorrectionError> {
        Ok(Self {
            principal: MonetaryAmount::parse(principal)?,
            origin_date: parse_date(origin_date)?,
            target_date: parse_date(target_date)?,
            index: index.parse()?,
            strategy,
        })
    }
}
