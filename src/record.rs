//! Applying correction outcomes to stored monetary records
//!
//! A record's current adjusted value is overwritten only by a successful
//! outcome. A failed outcome leaves the record exactly as it was and hands
//! the error back so the caller can report its specific kind.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::correction::{CorrectionOutcome, CorrectionRequest, CorrectionResult, Strategy};
use crate::error::CorrectionError;
use crate::index::IndexName;
use crate::money::MonetaryAmount;

/// A stored amount subject to correction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonetaryRecord {
    pub id: u64,
    pub principal: MonetaryAmount,
    pub origin_date: NaiveDate,
    pub current_adjusted_value: Option<MonetaryAmount>,
    pub last_index: Option<IndexName>,
    pub corrected_to: Option<NaiveDate>,
}

impl MonetaryRecord {
    pub fn new(id: u64, principal: MonetaryAmount, origin_date: NaiveDate) -> Self {
        Self {
            id,
            principal,
            origin_date,
            current_adjusted_value: None,
            last_index: None,
            corrected_to: None,
        }
    }

    /// Request correcting this record's principal up to `target_date`
    pub fn correction_request(&self, target_date: NaiveDate, index: IndexName, strategy: Strategy) -> CorrectionRequest {
        CorrectionRequest::new(self.principal.clone(), self.origin_date, target_date, index, strategy)
    }

    /// Store a successful correction; on failure leave the record untouched
    pub fn apply_outcome<'a>(&mut self, outcome: &'a CorrectionOutcome) -> Result<&'a CorrectionResult, CorrectionError> {
        match outcome {
            Ok(result) => {
                self.current_adjusted_value = Some(result.adjusted_value.clone());
                self.last_index = Some(result.applied_index);
                self.corrected_to = Some(result.target_date);
                Ok(result)
            }
            Err(err) => Err(err.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::CorrectionCalculator;
    use crate::error::ErrorKind;
    use crate::period::Period;
    use crate::rates::RateTable;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table(months: &[(u32, rust_decimal::Decimal)]) -> RateTable {
        RateTable::from_entries(
            months
                .iter()
                .map(|&(m, rate)| (IndexName::IpcaE, Period::month(2023, m).unwrap(), rate)),
        )
        .unwrap()
    }

    #[test]
    fn test_success_overwrites_adjusted_value() {
        let mut record = MonetaryRecord::new(7, MonetaryAmount::new(dec!(10000.00)), date(2023, 1, 15));
        let rates = table(&[(2, dec!(0.50)), (3, dec!(0.70)), (4, dec!(0.30))]);

        let request = record.correction_request(date(2023, 4, 15), IndexName::IpcaE, Strategy::Accumulated);
        let outcome = CorrectionCalculator::default().correct(&request, &rates);
        let result = record.apply_outcome(&outcome).unwrap();

        assert_eq!(result.breakdown.len(), 3);
        assert_eq!(record.current_adjusted_value, Some(MonetaryAmount::new(dec!(10150.71))));
        assert_eq!(record.last_index, Some(IndexName::IpcaE));
        assert_eq!(record.corrected_to, Some(date(2023, 4, 15)));
    }

    #[test]
    fn test_failure_leaves_record_unchanged() {
        let mut record = MonetaryRecord::new(7, MonetaryAmount::new(dec!(10000.00)), date(2023, 1, 15));
        record.current_adjusted_value = Some(MonetaryAmount::new(dec!(10050.00)));
        let before = record.clone();

        // March missing
        let rates = table(&[(2, dec!(0.50)), (4, dec!(0.30))]);
        let request = record.correction_request(date(2023, 4, 15), IndexName::IpcaE, Strategy::Accumulated);
        let outcome = CorrectionCalculator::default().correct(&request, &rates);

        let err = record.apply_outcome(&outcome).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorrectionUnavailable);
        assert_eq!(err.missing_period(), Period::month(2023, 3));
        assert_eq!(record, before);
    }
}
