//! Monetary Correction CLI
//!
//! Corrects one amount by a published index and prints the breakdown.
//!
//! Usage:
//!   correct --principal 10000.00 --origin 2023-01-15 --target 2023-04-15 --index IPCA_E
//!
//! The rate table is read from `--rates`, else `CORRECTION_RATES_PATH`, else
//! `data/rates.csv`. `--target` defaults to today.

use anyhow::Context;
use clap::Parser;
use monetary_correction::{
    correction::{CorrectionCalculator, CorrectionConfig, CorrectionRequest, Strategy},
    money::RoundingMode,
    period::PeriodInclusion,
    rates::{load_rates, rates_path_from_env},
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "correct", version, about = "Correct a monetary amount by an economic index")]
struct Args {
    /// Amount to correct, e.g. 10000.00
    #[arg(long)]
    principal: String,

    /// Origin date (YYYY-MM-DD)
    #[arg(long)]
    origin: String,

    /// Target date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    target: Option<String>,

    /// Index name: IPCA_E, IPCA, INPC, IGP_M, SELIC, TR
    #[arg(long)]
    index: String,

    /// flat or accumulated
    #[arg(long, default_value = "accumulated")]
    strategy: Strategy,

    /// half-up, half-even or up
    #[arg(long, default_value = "half-up")]
    rounding: RoundingMode,

    /// Fractional digits of monetary results
    #[arg(long, default_value_t = 2)]
    scale: u32,

    /// Also correct over the origin period
    #[arg(long)]
    include_origin: bool,

    /// Rate table CSV
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Write the breakdown CSV here
    #[arg(long)]
    breakdown_csv: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: monetary_correction::ErrorKind,
    message: String,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let rates_path = args.rates.clone().unwrap_or_else(rates_path_from_env);
    let rates = load_rates(&rates_path)
        .with_context(|| format!("Failed to load rate table from {}", rates_path.display()))?;

    let target = args
        .target
        .clone()
        .unwrap_or_else(|| chrono::Local::now().date_naive().format("%Y-%m-%d").to_string());

    let config = CorrectionConfig::default()
        .with_rounding(args.rounding)
        .with_scale(args.scale)
        .with_inclusion(if args.include_origin {
            PeriodInclusion::FromOriginPeriod
        } else {
            PeriodInclusion::FromFollowingPeriod
        });
    let calculator = CorrectionCalculator::new(config);

    let outcome = CorrectionRequest::parse(&args.principal, &args.origin, &target, &args.index, args.strategy)
        .and_then(|request| calculator.correct(&request, &rates));

    match outcome {
        Ok(result) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.explain());
            }

            if let Some(path) = &args.breakdown_csv {
                let file = std::fs::File::create(path)
                    .with_context(|| format!("Unable to create {}", path.display()))?;
                result.write_breakdown_csv(file)?;
                println!("\nBreakdown written to: {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            log::debug!("Correction failed: {}", err);
            if args.json {
                let response = ErrorResponse {
                    error: err.kind(),
                    message: err.user_message(),
                };
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                eprintln!("Error: {}", err.user_message());
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
