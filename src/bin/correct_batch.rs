//! Correct a batch of records from CSV
//!
//! Input columns: `id,principal,origin_date,target_date,index,strategy`
//! Output columns: `id,status,adjusted_value,factor,periods,error_kind,message`
//!
//! Every row is corrected against the same rate table snapshot. A row that
//! fails is reported with its error kind and does not stop the batch.
//!
//! Usage: cargo run --release --bin correct_batch -- --input requests.csv --output corrected.csv

use anyhow::Context;
use clap::Parser;
use monetary_correction::{
    correction::{CorrectionCalculator, CorrectionConfig, CorrectionOutcome, CorrectionRequest},
    error::ErrorKind,
    money::RoundingMode,
    rates::{load_rates, rates_path_from_env, SharedRateTable},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "correct_batch", about = "Correct every row of a CSV of requests")]
struct Args {
    /// Requests CSV
    #[arg(long)]
    input: PathBuf,

    /// Results CSV
    #[arg(long, default_value = "corrected.csv")]
    output: PathBuf,

    /// Rate table CSV
    #[arg(long)]
    rates: Option<PathBuf>,

    /// half-up, half-even or up
    #[arg(long, default_value = "half-up")]
    rounding: RoundingMode,
}

#[derive(Debug, Deserialize)]
struct RequestRow {
    id: u64,
    principal: String,
    origin_date: String,
    target_date: String,
    index: String,
    #[serde(default)]
    strategy: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResultRow {
    id: u64,
    status: &'static str,
    adjusted_value: Option<String>,
    factor: Option<String>,
    periods: Option<usize>,
    error_kind: Option<ErrorKind>,
    message: Option<String>,
}

impl ResultRow {
    fn from_outcome(id: u64, outcome: &CorrectionOutcome) -> Self {
        match outcome {
            Ok(result) => Self {
                id,
                status: "ok",
                adjusted_value: Some(result.adjusted_value.value.to_string()),
                factor: Some(result.factor.to_string()),
                periods: Some(result.periods_applied),
                error_kind: None,
                message: None,
            },
            Err(err) => Self {
                id,
                status: "error",
                adjusted_value: None,
                factor: None,
                periods: None,
                error_kind: Some(err.kind()),
                message: Some(err.user_message()),
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let rates_path = args.rates.clone().unwrap_or_else(rates_path_from_env);
    let shared = SharedRateTable::new(
        load_rates(&rates_path).with_context(|| format!("Failed to load rate table from {}", rates_path.display()))?,
    );

    let mut reader = csv::Reader::from_path(&args.input)
        .with_context(|| format!("Unable to open {}", args.input.display()))?;
    let rows: Vec<RequestRow> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .context("Malformed request row")?;
    println!("Loaded {} requests in {:?}", rows.len(), start.elapsed());

    let calculator = CorrectionCalculator::new(CorrectionConfig::default().with_rounding(args.rounding));
    let snapshot = shared.snapshot();

    let results: Vec<ResultRow> = rows
        .par_iter()
        .map(|row| {
            let strategy = match row.strategy.as_deref().filter(|s| !s.trim().is_empty()) {
                Some(s) => match s.parse() {
                    Ok(strategy) => strategy,
                    Err(message) => {
                        return ResultRow {
                            id: row.id,
                            status: "error",
                            adjusted_value: None,
                            factor: None,
                            periods: None,
                            error_kind: None,
                            message: Some(message),
                        }
                    }
                },
                None => Default::default(),
            };

            let outcome = CorrectionRequest::parse(
                &row.principal,
                &row.origin_date,
                &row.target_date,
                &row.index,
                strategy,
            )
            .and_then(|request| calculator.correct(&request, &snapshot));
            ResultRow::from_outcome(row.id, &outcome)
        })
        .collect();

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Unable to create {}", args.output.display()))?;
    for row in &results {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let failed = results.iter().filter(|r| r.status == "error").count();
    println!("Corrected {} of {} requests", results.len() - failed, results.len());
    println!("Results written to: {}", args.output.display());
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}
