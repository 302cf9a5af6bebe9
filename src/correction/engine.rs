//! Correction calculator: validation, decomposition and folding

use chrono::NaiveDate;
use log::{debug, warn};
use rayon::prelude::*;

use super::fold::{AccumulatedFold, FlatFold, PeriodFold};
use super::{CorrectionConfig, CorrectionOutcome, CorrectionRequest, CorrectionResult, Strategy};
use crate::error::CorrectionError;
use crate::index::IndexName;
use crate::money::MonetaryAmount;
use crate::period::periods_between;
use crate::rates::RateLookup;

/// Stateless calculator; every call is independent and re-entrant
#[derive(Debug, Clone, Default)]
pub struct CorrectionCalculator {
    config: CorrectionConfig,
}

impl CorrectionCalculator {
    pub fn new(config: CorrectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CorrectionConfig {
        &self.config
    }

    /// Correct by one cumulative factor over the whole interval
    pub fn apply_flat<R: RateLookup + ?Sized>(
        &self,
        principal: &MonetaryAmount,
        origin_date: NaiveDate,
        target_date: NaiveDate,
        index: IndexName,
        rates: &R,
    ) -> CorrectionOutcome {
        self.apply(Strategy::Flat, principal, origin_date, target_date, index, rates)
    }

    /// Correct by compounding period by period, rounding each step
    pub fn apply_accumulated<R: RateLookup + ?Sized>(
        &self,
        principal: &MonetaryAmount,
        origin_date: NaiveDate,
        target_date: NaiveDate,
        index: IndexName,
        rates: &R,
    ) -> CorrectionOutcome {
        self.apply(Strategy::Accumulated, principal, origin_date, target_date, index, rates)
    }

    /// Correct with the given strategy
    pub fn apply<R: RateLookup + ?Sized>(
        &self,
        strategy: Strategy,
        principal: &MonetaryAmount,
        origin_date: NaiveDate,
        target_date: NaiveDate,
        index: IndexName,
        rates: &R,
    ) -> CorrectionOutcome {
        // Validate before touching the rate table
        if !principal.is_positive() {
            return Err(CorrectionError::invalid_amount(principal.value));
        }
        if principal.value.normalize().scale() > self.config.scale {
            return Err(CorrectionError::InvalidAmount(format!(
                "principal {} has more than {} fractional digits",
                principal.value, self.config.scale
            )));
        }

        let folded = match strategy {
            Strategy::Flat => self.walk(
                FlatFold::new(self.config, principal.value),
                origin_date,
                target_date,
                index,
                rates,
            )?,
            Strategy::Accumulated => self.walk(
                AccumulatedFold::new(self.config, principal.value),
                origin_date,
                target_date,
                index,
                rates,
            )?,
        };

        debug!(
            "{} {} correction {} -> {}: {} periods, factor {}, {} -> {}",
            strategy,
            index,
            origin_date,
            target_date,
            folded.periods_applied,
            folded.factor,
            principal.value,
            folded.adjusted_value
        );

        Ok(CorrectionResult {
            applied_index: index,
            strategy,
            origin_date,
            target_date,
            principal: principal.clone(),
            adjusted_value: principal.map_value(folded.adjusted_value),
            factor: folded.factor,
            periods_applied: folded.periods_applied,
            breakdown: folded.breakdown,
        })
    }

    /// Run a fold over every period of the interval
    ///
    /// The first missing rate aborts the walk; the partial fold is dropped.
    fn walk<F: PeriodFold, R: RateLookup + ?Sized>(
        &self,
        mut fold: F,
        origin_date: NaiveDate,
        target_date: NaiveDate,
        index: IndexName,
        rates: &R,
    ) -> Result<super::fold::Folded, CorrectionError> {
        for period in periods_between(origin_date, target_date, index.granularity(), self.config.inclusion)? {
            let entry = rates.lookup(index, period).map_err(|err| {
                warn!("Correction aborted: {}", err);
                CorrectionError::from(err)
            })?;
            fold.step(&entry)?;
        }
        fold.finish()
    }

    /// Correct a single request
    pub fn correct<R: RateLookup + ?Sized>(&self, request: &CorrectionRequest, rates: &R) -> CorrectionOutcome {
        self.apply(
            request.strategy,
            &request.principal,
            request.origin_date,
            request.target_date,
            request.index,
            rates,
        )
    }

    /// Correct many requests in parallel against one rate table
    ///
    /// Outcomes are returned in request order; a failed request does not
    /// affect the others.
    pub fn correct_batch<R: RateLookup + ?Sized>(
        &self,
        requests: &[CorrectionRequest],
        rates: &R,
    ) -> Vec<CorrectionOutcome> {
        requests.par_iter().map(|request| self.correct(request, rates)).collect()
    }
}
