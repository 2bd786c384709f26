// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Resolve a report period (type + month + year) into an inclusive date window and a human label
// role: windowing/resolver
// inputs: ReportPeriod {Monthly | SemiAnnually | Annually, month 1-12, year}
// outputs: DateWindow {start, end} inclusive on both ends; end pinned to 23:59:59.999 of the final day
// invariants:
// - start <= end for every valid (year, month)
// - monthly end date equals the last day of that month (leap Februaries included)
// - an absent window (Option::None at the filter seam) means "no date restriction"
// errors: resolve_window bails on month outside 1-12
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Result, bail};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum ReportType {
  Monthly,
  SemiAnnually,
  Annually,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct ReportPeriod {
  pub report_type: ReportType,
  /// Reference month, 1-12. Selects the half for semi-annual periods;
  /// ignored for annual ones.
  pub month: u32,
  pub year: i32,
}

/// Inclusive on both ends.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DateWindow {
  pub start: NaiveDateTime,
  pub end: NaiveDateTime,
}

const MONTH_NAMES: [&str; 12] = [
  "January", "February", "March", "April", "May", "June",
  "July", "August", "September", "October", "November", "December",
];

fn last_day_of_month(year: i32, month: u32) -> u32 {
  // Advance to first day of next month, subtract one day
  let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
  let first_next = NaiveDate::from_ymd_opt(ny, nm, 1).unwrap();
  first_next.pred_opt().unwrap().day()
}

fn day_start(year: i32, month: u32, day: u32) -> NaiveDateTime {
  NaiveDate::from_ymd_opt(year, month, day).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

fn day_end(year: i32, month: u32, day: u32) -> NaiveDateTime {
  NaiveDate::from_ymd_opt(year, month, day)
    .unwrap()
    .and_hms_milli_opt(23, 59, 59, 999)
    .unwrap()
}

/// Compute the inclusive window for a period.
///
/// Monthly covers the selected month; semi-annual covers January-June when the
/// selected month is in the first half and July-December otherwise; annual
/// covers the whole year.
pub fn resolve_window(period: &ReportPeriod) -> Result<DateWindow> {
  if !(1..=12).contains(&period.month) {
    bail!("invalid month {}, expected 1-12", period.month);
  }
  let y = period.year;

  let window = match period.report_type {
    ReportType::Monthly => {
      let m = period.month;
      DateWindow {
        start: day_start(y, m, 1),
        end: day_end(y, m, last_day_of_month(y, m)),
      }
    }
    ReportType::SemiAnnually => {
      if period.month <= 6 {
        DateWindow { start: day_start(y, 1, 1), end: day_end(y, 6, 30) }
      } else {
        DateWindow { start: day_start(y, 7, 1), end: day_end(y, 12, 31) }
      }
    }
    ReportType::Annually => DateWindow { start: day_start(y, 1, 1), end: day_end(y, 12, 31) },
  };

  Ok(window)
}

/// Human label for the period, e.g. "May 2024", "July-December 2024",
/// "Year 2024". Feeds the report header and the artifact filename.
pub fn period_label(period: &ReportPeriod) -> String {
  match period.report_type {
    ReportType::Monthly => {
      let idx = (period.month.clamp(1, 12) - 1) as usize;
      format!("{} {}", MONTH_NAMES[idx], period.year)
    }
    ReportType::SemiAnnually => {
      if period.month <= 6 {
        format!("January-June {}", period.year)
      } else {
        format!("July-December {}", period.year)
      }
    }
    ReportType::Annually => format!("Year {}", period.year),
  }
}

/// Window membership for a (possibly unparsed) record timestamp.
///
/// With no window there is no date restriction and every record passes,
/// parseable timestamp or not. With a window, records whose timestamp failed
/// to parse are excluded rather than crashing the run.
pub fn in_window(ts: Option<NaiveDateTime>, window: Option<&DateWindow>) -> bool {
  match window {
    None => true,
    Some(w) => match ts {
      Some(t) => t >= w.start && t <= w.end,
      None => false,
    },
  }
}
