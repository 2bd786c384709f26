// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Aggregate windowed feedback records into counts, a 2-decimal average, per-service counts, and a 1-5 histogram
// role: statistics/aggregator
// inputs: &[FeedbackRecord] already filtered to the active window and service
// outputs: ReportStatistics
// invariants:
// - Ratings outside 1-5 are invisible to every aggregate
// - Histogram keys 1..=5 are always present; histogram and per_service each sum to total_valid
// - Pure function of its input; identical input yields identical output
// errors: None
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use crate::model::{FeedbackRecord, ReportStatistics};
use crate::util::round2;

pub const UNKNOWN_SERVICE: &str = "Unknown";

fn is_valid_rating(rating: i64) -> bool {
  (1..=5).contains(&rating)
}

/// Service bucket name for a record; absent or blank names fall into the
/// "Unknown" bucket.
pub fn service_bucket(record: &FeedbackRecord) -> String {
  match record.service_name.as_deref() {
    Some(name) if !name.trim().is_empty() => name.to_string(),
    _ => UNKNOWN_SERVICE.to_string(),
  }
}

/// Fold a record collection into ReportStatistics.
pub fn aggregate(records: &[FeedbackRecord]) -> ReportStatistics {
  let mut histogram: BTreeMap<u8, usize> = (1..=5u8).map(|r| (r, 0)).collect();
  let mut per_service: BTreeMap<String, usize> = BTreeMap::new();
  let mut total_valid = 0usize;
  let mut rating_sum = 0i64;

  for record in records {
    if !is_valid_rating(record.rating) {
      continue;
    }
    total_valid += 1;
    rating_sum += record.rating;

    // Already range-checked above; the clamp keeps the bucket key honest even
    // if the validity predicate ever loosens.
    let bucket = record.rating.clamp(1, 5) as u8;
    *histogram.entry(bucket).or_insert(0) += 1;
    *per_service.entry(service_bucket(record)).or_insert(0) += 1;
  }

  let average_rating = if total_valid == 0 {
    0.0
  } else {
    round2(rating_sum as f64 / total_valid as f64)
  };

  ReportStatistics { total_valid, average_rating, per_service, histogram }
}
