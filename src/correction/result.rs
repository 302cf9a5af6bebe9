//! Correction results, summaries and breakdown output

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::io::Write;

use super::Strategy;
use crate::index::IndexName;
use crate::money::MonetaryAmount;
use crate::period::Period;

/// One step of an accumulated correction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub period: Period,
    /// Published rate in percent
    pub rate: Decimal,
    /// `1 + rate / 100`
    pub factor: Decimal,
    /// Value after applying this period, rounded
    pub running_value: Decimal,
}

/// Outcome of a successful correction
///
/// Built once per calculation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub applied_index: IndexName,
    pub strategy: Strategy,
    pub origin_date: NaiveDate,
    pub target_date: NaiveDate,
    pub principal: MonetaryAmount,
    pub adjusted_value: MonetaryAmount,

    /// Cumulative factor over all applied periods
    pub factor: Decimal,

    pub periods_applied: usize,

    /// Per-period trail, filled by the accumulated strategy only
    pub breakdown: Vec<BreakdownEntry>,
}

/// Headline figures of a correction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionSummary {
    pub periods: usize,
    pub first_period: Option<Period>,
    pub last_period: Option<Period>,
    pub factor: Decimal,
    /// `adjusted_value - principal`
    pub correction_amount: Decimal,
    /// Percentage variation of the adjusted value over the principal,
    /// `None` when it does not fit in a decimal
    pub variation_pct: Option<Decimal>,
}

impl CorrectionResult {
    /// Summary statistics
    pub fn summary(&self) -> CorrectionSummary {
        let correction_amount = self.adjusted_value.value - self.principal.value;
        let variation_pct = correction_amount
            .checked_div(self.principal.value)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(|pct| pct.round_dp(4));

        CorrectionSummary {
            periods: self.periods_applied,
            first_period: self.breakdown.first().map(|e| e.period),
            last_period: self.breakdown.last().map(|e| e.period),
            factor: self.factor,
            correction_amount,
            variation_pct,
        }
    }

    /// Human-readable explanation of the calculation
    pub fn explain(&self) -> String {
        let summary = self.summary();
        let mut out = String::new();

        let _ = writeln!(
            out,
            "{} correction by {} from {} to {}",
            self.strategy, self.applied_index, self.origin_date, self.target_date
        );
        let _ = writeln!(out, "  Principal:      {}", self.principal);

        if !self.breakdown.is_empty() {
            let _ = writeln!(out, "  {:>10} {:>10} {:>18}", "Period", "Rate %", "Running value");
            for entry in &self.breakdown {
                let _ = writeln!(out, "  {:>10} {:>10} {:>18}", entry.period.to_string(), entry.rate, entry.running_value);
            }
        }

        let _ = writeln!(out, "  Periods:        {}", summary.periods);
        let _ = writeln!(out, "  Factor:         {}", summary.factor);
        let _ = writeln!(out, "  Correction:     {}", summary.correction_amount);
        match summary.variation_pct {
            Some(pct) => {
                let _ = writeln!(out, "  Variation:      {}%", pct);
            }
            None => {
                let _ = writeln!(out, "  Variation:      n/a");
            }
        }
        let _ = write!(out, "  Adjusted value: {}", self.adjusted_value);
        out
    }

    /// Write the breakdown as CSV (`period,rate,factor,running_value`)
    pub fn write_breakdown_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for entry in &self.breakdown {
            csv_writer.serialize(entry)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> CorrectionResult {
        let entries = [(2, dec!(0.50), dec!(10050.00)), (3, dec!(0.70), dec!(10120.35))];
        CorrectionResult {
            applied_index: IndexName::IpcaE,
            strategy: Strategy::Accumulated,
            origin_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            target_date: NaiveDate::from_ymd_opt(2023, 3, 15).unwrap(),
            principal: MonetaryAmount::new(dec!(10000.00)),
            adjusted_value: MonetaryAmount::new(dec!(10120.35)),
            factor: dec!(1.012035),
            periods_applied: 2,
            breakdown: entries
                .iter()
                .map(|&(month, rate, running_value)| BreakdownEntry {
                    period: Period::month(2023, month).unwrap(),
                    rate,
                    factor: Decimal::ONE + rate / Decimal::ONE_HUNDRED,
                    running_value,
                })
                .collect(),
        }
    }

    #[test]
    fn test_summary() {
        let summary = sample().summary();
        assert_eq!(summary.periods, 2);
        assert_eq!(summary.first_period, Period::month(2023, 2));
        assert_eq!(summary.last_period, Period::month(2023, 3));
        assert_eq!(summary.correction_amount, dec!(120.35));
        assert_eq!(summary.variation_pct, Some(dec!(1.2035)));
    }

    #[test]
    fn test_summary_with_huge_variation_does_not_panic() {
        let mut result = sample();
        result.principal = MonetaryAmount::new(dec!(1.00));
        result.adjusted_value = MonetaryAmount::new(Decimal::MAX);

        let summary = result.summary();
        assert_eq!(summary.correction_amount, Decimal::MAX - dec!(1.00));
        assert_eq!(summary.variation_pct, None);
        assert!(result.explain().contains("Variation:      n/a"));
    }

    #[test]
    fn test_explain_lists_every_period() {
        let text = sample().explain();
        assert!(text.starts_with("accumulated correction by IPCA_E from 2023-01-15 to 2023-03-15"));
        assert!(text.contains("2023-02"));
        assert!(text.contains("10120.35"));
        assert!(text.ends_with("Adjusted value: BRL 10120.35"));
    }

    #[test]
    fn test_breakdown_csv() {
        let mut buffer = Vec::new();
        sample().write_breakdown_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "period,rate,factor,running_value");
        assert!(lines[1].starts_with("2023-02,0.50,1.005"));
        assert!(lines[1].ends_with(",10050.00"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["applied_index"], "IPCA_E");
        assert_eq!(json["strategy"], "accumulated");
        assert_eq!(json["breakdown"][0]["period"], "2023-02");
        assert_eq!(json["adjusted_value"]["value"], "10120.35");
    }
}
