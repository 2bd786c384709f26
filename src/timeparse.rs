// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Normalize heterogeneous record timestamps (epoch millis, ISO strings, locale MM/DD/YY strings) into NaiveDateTime
// role: parsing/normalizer
// inputs: model::Timestamp or raw &str
// outputs: Option<NaiveDateTime>; None signals parse failure
// invariants:
// - Never panics; failures stay inside the chain as None
// - Strategies run in a fixed order, first success wins
// - Two-digit years map to 2000+year; 12 AM is hour 0, 12 PM stays 12
// errors: None; callers exclude unparseable records from date-windowed views
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Timestamp;

/// Upstream persists timestamps through more than one path, so record shapes
/// vary. The chain is ordered most-structured first; locale parsing is the
/// last resort before giving up.
const STRATEGIES: &[fn(&str) -> Option<NaiveDateTime>] = &[parse_rfc3339, parse_iso_naive, parse_locale];

/// Normalize a record timestamp. `None` means the record cannot take part in
/// date-windowed views; it is never an error.
pub fn parse_timestamp(ts: &Timestamp) -> Option<NaiveDateTime> {
  match ts {
    Timestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms).map(|dt| dt.naive_utc()),
    Timestamp::Text(raw) => parse_text(raw),
  }
}

/// Run the strategy chain over a raw string.
pub fn parse_text(raw: &str) -> Option<NaiveDateTime> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }
  STRATEGIES.iter().find_map(|try_parse| try_parse(trimmed))
}

fn parse_rfc3339(raw: &str) -> Option<NaiveDateTime> {
  // Zoned inputs normalize to UTC so mixed-zone stores stay comparable.
  DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc())
}

fn parse_iso_naive(raw: &str) -> Option<NaiveDateTime> {
  NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
    .ok()
    .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").ok())
    .or_else(|| {
      NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

/// Locale strings look like `MM/DD/YY, HH:MM:SS AM` (four-digit years appear
/// too, and the time part may be missing entirely).
fn parse_locale(raw: &str) -> Option<NaiveDateTime> {
  if !raw.contains('/') {
    return None;
  }

  let (date_part, time_part) = match raw.split_once(", ") {
    Some((d, t)) => (d, Some(t)),
    None => (raw, None),
  };

  let date = parse_locale_date(date_part.trim())?;
  match time_part {
    None => date.and_hms_opt(0, 0, 0),
    Some(t) => {
      let (h, m, s) = parse_locale_time(t.trim())?;
      date.and_hms_opt(h, m, s)
    }
  }
}

fn parse_locale_date(raw: &str) -> Option<NaiveDate> {
  static RE_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2}|\d{4})$").unwrap());

  let caps = RE_DATE.captures(raw)?;
  let month: u32 = caps.get(1)?.as_str().parse().ok()?;
  let day: u32 = caps.get(2)?.as_str().parse().ok()?;
  let year_raw = caps.get(3)?.as_str();
  let mut year: i32 = year_raw.parse().ok()?;
  if year_raw.len() == 2 {
    year += 2000;
  }

  NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_locale_time(raw: &str) -> Option<(u32, u32, u32)> {
  static RE_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{1,2})(?::(\d{1,2}))?\s*(AM|PM|am|pm)?$").unwrap());

  let caps = RE_TIME.captures(raw)?;
  let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
  let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
  let second: u32 = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;

  if let Some(half) = caps.get(4) {
    let pm = half.as_str().eq_ignore_ascii_case("pm");
    if hour == 12 {
      // 12 AM is midnight; 12 PM stays 12
      if !pm {
        hour = 0;
      }
    } else if pm {
      hour += 12;
    }
  }

  if hour > 23 || minute > 59 || second > 59 {
    return None;
  }
  Some((hour, minute, second))
}
