// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate a report run: load, window-filter, aggregate, render two-phase, save artifacts, print pointers
// role: processing/orchestrator
// inputs: EffectiveConfig, optional now override
// outputs: PDF and/or JSON artifacts on disk (or JSON on stdout); pointer JSON per written file
// side_effects: Creates the output directory; writes files; prints to stdout/stderr
// invariants:
// - The renderer never runs against an empty or partially loaded record set
// - The busy flag is held for the whole generation and released on every exit path
// - Artifact names derive from the period label and the generation epoch millis
// errors: Empty window aborts with a user-facing warning and no artifact; everything else bubbles with context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::cli::{EffectiveConfig, OutputFormat};
use crate::layout::{LayoutOptions, layout_report, stamp_footers};
use crate::model::{FeedbackRecord, ReportSummary, WindowInfo};
use crate::pdf;
use crate::period::{DateWindow, in_window, period_label, resolve_window};
use crate::source;
use crate::stats::aggregate;
use crate::timeparse;
use crate::util::{effective_now, sanitize_label};

/// Single-slot generation gate. A second request while one is in flight is
/// refused rather than queued; the guard releases on drop, error paths
/// included.
pub struct BusyFlag {
  busy: AtomicBool,
}

pub struct BusyGuard<'a> {
  flag: &'a BusyFlag,
}

impl BusyFlag {
  pub const fn new() -> BusyFlag {
    BusyFlag { busy: AtomicBool::new(false) }
  }

  pub fn try_acquire(&self) -> Option<BusyGuard<'_>> {
    if self.busy.swap(true, Ordering::AcqRel) {
      return None;
    }
    Some(BusyGuard { flag: self })
  }
}

impl Drop for BusyGuard<'_> {
  fn drop(&mut self) {
    self.flag.busy.store(false, Ordering::Release);
  }
}

static GENERATION: BusyFlag = BusyFlag::new();

/// Keep records matching the service filter and the date window. A `None`
/// window means no date restriction; with a window, records whose timestamp
/// fails to parse fall out instead of failing the run.
pub fn filter_records(
  records: &[FeedbackRecord],
  service_id: Option<&str>,
  window: Option<&DateWindow>,
) -> Vec<FeedbackRecord> {
  records
    .iter()
    .filter(|r| service_id.map_or(true, |id| r.service_id == id))
    .filter(|r| in_window(timeparse::parse_timestamp(&r.created_at), window))
    .cloned()
    .collect()
}

fn window_info(label: &str, window: &DateWindow) -> WindowInfo {
  WindowInfo {
    label: label.to_string(),
    start: window.start.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
    end: window.end.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
  }
}

fn artifact_name(label: &str, millis: i64, ext: &str) -> String {
  format!("Feedback_Report_{}_{}.{}", sanitize_label(label), millis, ext)
}

fn write_artifact(out_dir: &str, name: &str, bytes: &[u8]) -> Result<String> {
  let dir = if out_dir == "-" { "." } else { out_dir };
  std::fs::create_dir_all(dir).with_context(|| format!("creating output directory {}", dir))?;
  let path = Path::new(dir).join(name);
  std::fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
  Ok(path.to_string_lossy().to_string())
}

/// Run one report generation end to end.
pub fn run(cfg: &EffectiveConfig, now_opt: Option<DateTime<Local>>) -> Result<()> {
  let dataset = source::load(&cfg.source)?;

  let window = resolve_window(&cfg.period)?;
  let label = period_label(&cfg.period);

  let records = filter_records(&dataset.records, cfg.service.as_deref(), Some(&window));
  if records.is_empty() {
    eprintln!("[report] No feedback records in {}; report not generated", label);
    bail!("no feedback records in {}", label);
  }

  let _busy = GENERATION
    .try_acquire()
    .context("a report generation is already in progress")?;

  let stats = aggregate(&records);
  let now = effective_now(now_opt);
  let millis = now.timestamp_millis();

  if matches!(cfg.format, OutputFormat::Pdf | OutputFormat::Both) {
    let opts = LayoutOptions { max_rows: cfg.max_rows };
    let mut pages = layout_report(&stats, &records, &label, &opts);
    stamp_footers(&mut pages);

    let bytes = pdf::render(&pages, &format!("Feedback Report {}", label))?;
    let path = write_artifact(&cfg.out, &artifact_name(&label, millis, "pdf"), &bytes)?;

    println!(
      "{}",
      serde_json::to_string_pretty(&serde_json::json!({
        "file": path,
        "records": records.len(),
        "pages": pages.len(),
      }))?
    );
  }

  if matches!(cfg.format, OutputFormat::Json | OutputFormat::Both) {
    let shown = records.len().min(cfg.max_rows);
    let omitted = records.len() - shown;
    let summary = ReportSummary {
      period: window_info(&label, &window),
      statistics: stats.clone(),
      row_count: shown,
      omitted: (omitted > 0).then_some(omitted),
    };

    if cfg.out == "-" {
      println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
      let bytes = serde_json::to_vec_pretty(&summary)?;
      let path = write_artifact(&cfg.out, &artifact_name(&label, millis, "json"), &bytes)?;
      println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
          "file": path,
          "records": records.len(),
        }))?
      );
    }
  }

  Ok(())
}
