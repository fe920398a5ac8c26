//! Command-line collaborator around the core.
//!
//! The binary only loads the two input files, calls the core, and
//! prints its outputs as JSON; all validation and math live in the
//! library crates.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use sr_common::{Operator, Result};
use sr_config::AnalysisConfig;

use crate::estimate::{reconciled_estimates, MetricEstimate};
use crate::incident::{load_incidents, IncidentRecord};
use crate::ledger::ExposureLedger;
use crate::reconcile::reconcile;

#[derive(Debug, Parser)]
#[command(
    name = "saferate",
    version,
    about = "Miles-per-incident credible intervals for AV fleet operators"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate the exposure and incident datasets, then exit.
    Check {
        /// Exposure dataset (strict CSV).
        #[arg(long)]
        exposure: PathBuf,

        /// Incident feed (JSON array).
        #[arg(long)]
        incidents: PathBuf,
    },

    /// Reconcile the datasets and print per-metric rate estimates.
    Estimate {
        /// Exposure dataset (strict CSV).
        #[arg(long)]
        exposure: PathBuf,

        /// Incident feed (JSON array).
        #[arg(long)]
        incidents: PathBuf,

        /// Credible mass percentage, within [50, 99.9].
        #[arg(long, default_value_t = 90.0)]
        mass: f64,
    },
}

#[derive(Serialize)]
struct CheckReport {
    exposure_rows: usize,
    incidents: usize,
    incidents_by_company: BTreeMap<String, usize>,
}

#[derive(Serialize)]
struct EstimateReport {
    credible_mass_pct: f64,
    estimates: Vec<MetricEstimate>,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Check {
            exposure,
            incidents,
        } => {
            let (ledger, records) = load_inputs(&exposure, &incidents)?;
            reconcile(&ledger, &records, &AnalysisConfig::default())?;
            let report = CheckReport {
                exposure_rows: ledger.len(),
                incidents: records.len(),
                incidents_by_company: count_by_company(&records),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::Estimate {
            exposure,
            incidents,
            mass,
        } => {
            let (ledger, records) = load_inputs(&exposure, &incidents)?;
            let config = AnalysisConfig {
                credible_mass_pct: mass,
                ..AnalysisConfig::default()
            };
            let recon = reconcile(&ledger, &records, &config)?;
            let estimates = reconciled_estimates(&recon, &config)?;
            let report = EstimateReport {
                credible_mass_pct: mass,
                estimates,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

fn load_inputs(exposure: &Path, incidents: &Path) -> Result<(ExposureLedger, Vec<IncidentRecord>)> {
    let ledger = ExposureLedger::parse(&fs::read_to_string(exposure)?)?;
    let records = load_incidents(&fs::read_to_string(incidents)?)?;
    for (company, n) in count_by_company(&records) {
        info!(company = %company, incidents = n, "loaded");
    }
    Ok((ledger, records))
}

fn count_by_company(records: &[IncidentRecord]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for op in Operator::ALL {
        let n = records.iter().filter(|r| r.operator == op).count();
        if n > 0 {
            counts.insert(op.to_string(), n);
        }
    }
    counts
}
