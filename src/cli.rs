use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::period::{ReportPeriod, ReportType};
use crate::source::SourceSpec;

#[derive(Parser, Debug)]
#[command(
    name = "feedback-report",
    version,
    about = "Generate feedback analytics reports (PDF or JSON) for the service-guidance portal",
    long_about = None
)]
pub struct Cli {
  /// Path to a feedback records JSON export
  #[arg(long)]
  pub input: Option<PathBuf>,

  /// Optional services JSON export (backfills missing service names)
  #[arg(long)]
  pub services: Option<PathBuf>,

  /// Fetch records and services from the platform REST API instead of a file
  #[arg(long = "api-url")]
  pub api_url: Option<String>,

  /// Session store file holding the signed-in token (required with --api-url)
  #[arg(long)]
  pub session: Option<PathBuf>,

  /// Report period type
  #[arg(long = "report-type", value_enum, default_value_t = ReportType::Monthly)]
  pub report_type: ReportType,

  /// Reference month 1-12; required for monthly and semi-annual reports
  #[arg(long)]
  pub month: Option<u32>,

  /// Report year, e.g. 2024
  #[arg(long)]
  pub year: i32,

  /// Only include feedback for this service id
  #[arg(long)]
  pub service: Option<String>,

  /// Detail-table row cap; records past it are summarized in a trailing note
  #[arg(long = "max-rows", default_value_t = 25)]
  pub max_rows: usize,

  /// Output artifact format
  #[arg(long, value_enum, default_value_t = OutputFormat::Pdf)]
  pub format: OutputFormat,

  /// Output directory; "-" prints JSON to stdout (PDF still lands in the current dir)
  #[arg(long, default_value = ".")]
  pub out: String,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant used for artifact timestamps (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
  Pdf,
  Json,
  Both,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EffectiveConfig {
  pub source: SourceSpec,
  pub period: ReportPeriod,
  pub service: Option<String>,
  pub max_rows: usize,
  pub format: OutputFormat,
  pub out: String,
  pub now_override: Option<String>,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  // Validate source selection
  let source = match (&cli.input, &cli.api_url) {
    (Some(records), None) => SourceSpec::File {
      records: records.clone(),
      services: cli.services.clone(),
    },
    (None, Some(base)) => {
      let session = match &cli.session {
        Some(p) => p.clone(),
        None => bail!("--api-url requires --session (the signed-in session store file)"),
      };
      SourceSpec::Api { base: base.clone(), session }
    }
    (None, None) => bail!("Provide one of --input or --api-url"),
    (Some(_), Some(_)) => bail!("Ambiguous source: choose only one of --input | --api-url"),
  };

  // Month is the half/month selector; annual reports do not need one
  let month = match cli.report_type {
    ReportType::Annually => cli.month.unwrap_or(1),
    _ => match cli.month {
      Some(m) if (1..=12).contains(&m) => m,
      Some(m) => bail!("invalid --month {}, expected 1-12", m),
      None => bail!("--month is required for {:?} reports", cli.report_type),
    },
  };

  if cli.max_rows == 0 {
    bail!("--max-rows must be at least 1");
  }

  Ok(EffectiveConfig {
    source,
    period: ReportPeriod {
      report_type: cli.report_type,
      month,
      year: cli.year,
    },
    service: cli.service,
    max_rows: cli.max_rows,
    format: cli.format,
    out: cli.out,
    now_override: cli.now_override,
  })
}
