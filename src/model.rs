// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the serde data model (feedback records, services, statistics, report summary) shared across the crate
// role: model/types
// outputs: Serializable structs with stable field names; optional fields skipped when absent
// invariants: Records are read-only snapshots; statistics maps sum back to the valid record count
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A record's creation timestamp as the upstream store delivers it: either an
/// epoch-milliseconds number or a string in one of several shapes. Parsing is
/// the job of `crate::timeparse`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum Timestamp {
  Millis(i64),
  Text(String),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FeedbackRecord {
  pub id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub user_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub user_email: Option<String>,
  pub service_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub service_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub step: Option<u32>,
  /// Semantically 1-5, not guaranteed by upstream.
  pub rating: i64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub comment: Option<String>,
  pub created_at: Timestamp,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceRecord {
  pub id: String,
  pub name: String,
}

/// Aggregates over the windowed record set. Both maps sum to `total_valid`:
/// every valid record lands in exactly one service bucket and one rating
/// bucket, and all five rating keys are always present.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReportStatistics {
  pub total_valid: usize,
  /// Rounded to 2 decimals; 0 when there are no valid records.
  pub average_rating: f64,
  pub per_service: BTreeMap<String, usize>,
  pub histogram: BTreeMap<u8, usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WindowInfo {
  pub label: String,
  pub start: String,
  pub end: String,
}

/// The JSON-format report document (`--format json`).
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportSummary {
  pub period: WindowInfo,
  pub statistics: ReportStatistics,
  pub row_count: usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub omitted: Option<usize>,
}
