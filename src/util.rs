// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for the deterministic clock, text shaping (truncate/wrap), rounding, labels, and man page rendering
// role: utilities/helpers
// inputs: Various primitives; DateTime; clap CommandFactory
// outputs: Formatted strings, wrapped/truncated text, man page text
// invariants:
// - truncate_ellipsis and wrap_chars never split a character
// - round2 is stable for the 2-decimal display contract
// - sanitize_label output contains no spaces (filename-safe)
// errors: render_man_page bubbles IO errors; everything else is infallible
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Local};
use clap::CommandFactory;

/// Parse a `--now-override` string into a local DateTime.
/// Accepts RFC3339 (e.g. 2024-06-01T00:00:00Z) or a naive local timestamp
/// formatted as `%Y-%m-%dT%H:%M:%S`.
pub fn parse_now_override(s: Option<&str>) -> Option<DateTime<Local>> {
  s.and_then(|raw| {
    chrono::DateTime::parse_from_rfc3339(raw)
      .ok()
      .map(|dt| dt.with_timezone(&Local))
      .or_else(|| {
        chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
          .ok()
          .and_then(|ndt| ndt.and_local_timezone(Local).single())
      })
  })
}

/// Returns the effective "now" given an optional override.
///
/// Centralizes our handling of test determinism without sprinkling
/// `Local::now()` throughout the code.
pub fn effective_now(override_now: Option<DateTime<Local>>) -> DateTime<Local> {
  override_now.unwrap_or_else(Local::now)
}

/// Round to two decimal places for display-stable averages.
pub fn round2(v: f64) -> f64 {
  (v * 100.0).round() / 100.0
}

/// Truncate to at most `max_chars` characters, appending an ellipsis when
/// anything was cut. Character-based, so multi-byte input never splits.
pub fn truncate_ellipsis(text: &str, max_chars: usize) -> String {
  if text.chars().count() <= max_chars {
    return text.to_string();
  }
  let head: String = text.chars().take(max_chars.saturating_sub(3)).collect();
  format!("{}...", head)
}

/// Break text into chunks of at most `width` characters. Empty input yields a
/// single empty line so callers can count lines for row sizing.
pub fn wrap_chars(text: &str, width: usize) -> Vec<String> {
  if width == 0 || text.is_empty() {
    return vec![text.to_string()];
  }
  let chars: Vec<char> = text.chars().collect();
  chars.chunks(width).map(|c| c.iter().collect()).collect()
}

/// Spaces become underscores so the label can sit inside a filename.
pub fn sanitize_label(label: &str) -> String {
  label.replace(' ', "_")
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
