//! Folding policies over the decomposed periods

use rust_decimal::Decimal;

use super::result::BreakdownEntry;
use super::CorrectionConfig;
use crate::error::CorrectionError;
use crate::rates::RateEntry;

/// Output of a completed fold
#[derive(Debug)]
pub(super) struct Folded {
    pub adjusted_value: Decimal,
    pub factor: Decimal,
    pub periods_applied: usize,
    pub breakdown: Vec<BreakdownEntry>,
}

/// Consumes the period rates of one calculation in order
pub(super) trait PeriodFold {
    fn step(&mut self, entry: &RateEntry) -> Result<(), CorrectionError>;

    fn finish(self) -> Result<Folded, CorrectionError>;
}

fn overflow(entry: &RateEntry) -> CorrectionError {
    CorrectionError::Arithmetic {
        index: entry.index,
        period: entry.period,
    }
}

/// Compounds factors, applies them once at the end
pub(super) struct FlatFold {
    config: CorrectionConfig,
    principal: Decimal,
    factor: Decimal,
    periods: usize,
    last: Option<RateEntry>,
}

impl FlatFold {
    pub fn new(config: CorrectionConfig, principal: Decimal) -> Self {
        Self {
            config,
            principal,
            factor: Decimal::ONE,
            periods: 0,
            last: None,
        }
    }
}

impl PeriodFold for FlatFold {
    fn step(&mut self, entry: &RateEntry) -> Result<(), CorrectionError> {
        let factor = self.factor.checked_mul(entry.factor()).ok_or_else(|| overflow(entry))?;
        self.factor = self.config.rounding.round(factor, self.config.factor_scale);
        self.periods += 1;
        self.last = Some(*entry);
        Ok(())
    }

    fn finish(self) -> Result<Folded, CorrectionError> {
        let adjusted_value = match self.last {
            // Nothing to apply: the principal comes back untouched
            None => self.principal,
            Some(last) => {
                let value = self.principal.checked_mul(self.factor).ok_or_else(|| overflow(&last))?;
                self.config.rounding.round(value, self.config.scale)
            }
        };

        Ok(Folded {
            adjusted_value,
            factor: self.factor,
            periods_applied: self.periods,
            breakdown: Vec::new(),
        })
    }
}

/// Compounds the running value period by period, rounding each step
pub(super) struct AccumulatedFold {
    config: CorrectionConfig,
    running: Decimal,
    factor: Decimal,
    breakdown: Vec<BreakdownEntry>,
}

impl AccumulatedFold {
    pub fn new(config: CorrectionConfig, principal: Decimal) -> Self {
        Self {
            config,
            running: principal,
            factor: Decimal::ONE,
            breakdown: Vec::new(),
        }
    }
}

impl PeriodFold for AccumulatedFold {
    fn step(&mut self, entry: &RateEntry) -> Result<(), CorrectionError> {
        let period_factor = entry.factor();
        let running = self.running.checked_mul(period_factor).ok_or_else(|| overflow(entry))?;
        let factor = self.factor.checked_mul(period_factor).ok_or_else(|| overflow(entry))?;

        self.running = self.config.rounding.round(running, self.config.scale);
        self.factor = self.config.rounding.round(factor, self.config.factor_scale);
        self.breakdown.push(BreakdownEntry {
            period: entry.period,
            rate: entry.rate,
            factor: period_factor,
            running_value: self.running,
        });
        Ok(())
    }

    fn finish(self) -> Result<Folded, CorrectionError> {
        Ok(Folded {
            adjusted_value: self.running,
            factor: self.factor,
            periods_applied: self.breakdown.len(),
            breakdown: self.breakdown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexName;
    use crate::period::Period;
    use rust_decimal_macros::dec;

    fn entry(month: u32, rate: Decimal) -> RateEntry {
        RateEntry {
            index: IndexName::IpcaE,
            period: Period::month(2023, month).unwrap(),
            rate,
        }
    }

    #[test]
    fn test_flat_rounds_once() {
        let mut fold = FlatFold::new(CorrectionConfig::default(), dec!(10000.00));
        for (month, rate) in [(2, dec!(0.50)), (3, dec!(0.70)), (4, dec!(0.30))] {
            fold.step(&entry(month, rate)).unwrap();
        }
        let folded = fold.finish().unwrap();

        assert_eq!(folded.factor, dec!(1.015071105));
        assert_eq!(folded.adjusted_value, dec!(10150.71));
        assert_eq!(folded.periods_applied, 3);
        assert!(folded.breakdown.is_empty());
    }

    #[test]
    fn test_accumulated_rounds_every_step() {
        let mut fold = AccumulatedFold::new(CorrectionConfig::default(), dec!(100.00));
        fold.step(&entry(2, dec!(0.333))).unwrap();
        fold.step(&entry(3, dec!(0.333))).unwrap();
        let folded = fold.finish().unwrap();

        // 100.333 -> 100.33, 100.33 * 1.00333 = 100.664098... -> 100.66
        assert_eq!(folded.breakdown[0].running_value, dec!(100.33));
        assert_eq!(folded.adjusted_value, dec!(100.66));
    }

    #[test]
    fn test_empty_fold_is_identity() {
        let flat = FlatFold::new(CorrectionConfig::default(), dec!(10.005)).finish().unwrap();
        assert_eq!(flat.adjusted_value, dec!(10.005));
        assert_eq!(flat.factor, Decimal::ONE);

        let accumulated = AccumulatedFold::new(CorrectionConfig::default(), dec!(10.005)).finish().unwrap();
        assert_eq!(accumulated.adjusted_value, dec!(10.005));
    }

    #[test]
    fn test_overflow_reported() {
        let mut fold = AccumulatedFold::new(CorrectionConfig::default(), Decimal::MAX);
        let err = fold.step(&entry(2, dec!(50))).unwrap_err();
        assert!(matches!(err, CorrectionError::Arithmetic { .. }));
    }
}
