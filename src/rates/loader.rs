//! Load rate tables from CSV
//!
//! Expected columns: `index,period,rate`
//!
//! ```text
//! index,period,rate
//! IPCA_E,2023-02,0.50
//! SELIC,2023-02-01,0.0508
//! ```
//!
//! `period` is `YYYY-MM` for monthly indices and `YYYY-MM-DD` for daily ones.
//! `rate` is a percentage and is parsed as an exact decimal.
//!
//! Daily indices need a row for every calendar day, weekends and holidays
//! included (a `0` rate on non-business days). A missing day fails any
//! correction whose interval crosses it.

use log::info;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::RateTable;
use crate::error::RateTableError;
use crate::index::IndexName;
use crate::period::Period;

/// Default location of the rate table
pub const DEFAULT_RATES_PATH: &str = "data/rates.csv";

/// Environment variable overriding [`DEFAULT_RATES_PATH`]
pub const RATES_PATH_ENV: &str = "CORRECTION_RATES_PATH";

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    index: String,
    period: String,
    rate: String,
}

impl CsvRow {
    fn parse(self, line: u64) -> Result<(IndexName, Period, Decimal), RateTableError> {
        let parse_err = |message: String| RateTableError::Parse { line, message };

        let index: IndexName = self.index.parse().map_err(|e: crate::error::CorrectionError| parse_err(e.to_string()))?;
        let period: Period = self.period.parse().map_err(parse_err)?;
        let rate = Decimal::from_str_exact(self.rate.trim())
            .map_err(|_| parse_err(format!("invalid rate {:?}", self.rate)))?;

        Ok((index, period, rate))
    }
}

/// Load a rate table from any reader
pub fn load_rates_from_reader<R: Read>(reader: R) -> Result<RateTable, RateTableError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut table = RateTable::new();

    let headers = csv_reader.headers()?.clone();

    for result in csv_reader.records() {
        let record = result?;
        // Physical line in the file, blank lines included
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: CsvRow = record.deserialize(Some(&headers))?;
        let (index, period, rate) = row.parse(line)?;
        table.insert(index, period, rate)?;
    }

    Ok(table)
}

/// Load a rate table from a CSV file
pub fn load_rates<P: AsRef<Path>>(path: P) -> Result<RateTable, RateTableError> {
    let path = path.as_ref();
    let table = load_rates_from_reader(File::open(path)?)?;
    info!("Loaded {} rate entries from {}", table.len(), path.display());
    Ok(table)
}

/// Rate table path from the environment, falling back to the default
pub fn rates_path_from_env() -> PathBuf {
    std::env::var_os(RATES_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RATES_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::RateLookup;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_from_reader() {
        let csv = "index,period,rate\n\
                   IPCA_E,2023-02,0.50\n\
                   IPCA-E,2023-03,0.70\n\
                   SELIC,2023-02-01, 0.0508\n";

        let table = load_rates_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);

        let entry = table.lookup(IndexName::IpcaE, Period::month(2023, 3).unwrap()).unwrap();
        assert_eq!(entry.rate, dec!(0.70));

        let day = Period::day(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
        assert_eq!(table.lookup(IndexName::Selic, day).unwrap().rate, dec!(0.0508));
    }

    #[test]
    fn test_unknown_index_reports_line() {
        let csv = "index,period,rate\nIPCA_E,2023-02,0.50\nIGP_DI,2023-02,0.10\n";

        match load_rates_from_reader(csv.as_bytes()) {
            Err(RateTableError::Parse { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("IGP_DI"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_line_counts_blank_lines() {
        let csv = "index,period,rate\n\nIPCA_E,2023-02,0.50\n\nIGP_DI,2023-02,0.10\n";

        match load_rates_from_reader(csv.as_bytes()) {
            Err(RateTableError::Parse { line, .. }) => assert_eq!(line, 5),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_rate_and_period_rejected() {
        let bad_rate = "index,period,rate\nINPC,2023-02,abc\n";
        assert!(matches!(
            load_rates_from_reader(bad_rate.as_bytes()),
            Err(RateTableError::Parse { line: 2, .. })
        ));

        let bad_period = "index,period,rate\nINPC,2023-14,0.3\n";
        assert!(matches!(
            load_rates_from_reader(bad_period.as_bytes()),
            Err(RateTableError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_duplicate_row_rejected() {
        let csv = "index,period,rate\nTR,2023-02,0.1\nTR,2023-02,0.2\n";
        assert!(matches!(
            load_rates_from_reader(csv.as_bytes()),
            Err(RateTableError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_load_bundled_rates() {
        let table = load_rates(DEFAULT_RATES_PATH).expect("bundled rate table should load");
        assert!(table.latest_period(IndexName::IpcaE).is_some());
    }
}
