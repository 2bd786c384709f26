// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Phase-one page layout for the feedback report (summary + detail table) and phase-two footer stamping
// role: rendering/layout
// inputs: ReportStatistics, windowed record list, period label, LayoutOptions
// outputs: Vec<PageContent> of positioned text ops and rules; coordinates in millimetres, landscape A4
// side_effects: None; the emit step in crate::pdf turns descriptors into bytes
// invariants:
// - Layout never mutates its inputs
// - Footers are stamped only after the final page count is known
// - The detail table renders at most max_rows records and notes the omitted count
// - Row advance is the taller of the fixed minimum and the wrapped email line count
// errors: None; empty-input refusal happens upstream in crate::report
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::model::{FeedbackRecord, ReportStatistics};
use crate::stats::service_bucket;
use crate::timeparse;
use crate::util::{truncate_ellipsis, wrap_chars};

// Landscape A4 geometry, millimetres.
pub const PAGE_WIDTH: f64 = 297.0;
pub const PAGE_HEIGHT: f64 = 210.0;
const LEFT: f64 = 15.0;
const RIGHT: f64 = 282.0;
const TOP_Y: f64 = 195.0;
// Near-bottom threshold: below this the cursor moves to a fresh page.
const BOTTOM_Y: f64 = 25.0;
const FOOTER_RULE_Y: f64 = 16.0;
const FOOTER_TEXT_Y: f64 = 11.0;

const LINE_LG: f64 = 9.0;
const LINE_MD: f64 = 6.5;
const LINE_SM: f64 = 5.0;
const SUB_LINE: f64 = 4.2;
const MIN_ROW: f64 = 6.0;

const SIZE_TITLE: f64 = 20.0;
const SIZE_SUBTITLE: f64 = 11.0;
const SIZE_HEADING: f64 = 11.0;
const SIZE_BODY: f64 = 9.0;
const SIZE_TABLE: f64 = 7.5;
const SIZE_FOOTER: f64 = 7.0;

// Detail table columns: x origin and character budget.
const COL_INDEX_X: f64 = 15.0;
const COL_EMAIL_X: f64 = 25.0;
const COL_SERVICE_X: f64 = 90.0;
const COL_STEP_X: f64 = 143.0;
const COL_RATING_X: f64 = 160.0;
const COL_DATE_X: f64 = 174.0;
const COL_COMMENT_X: f64 = 212.0;
pub const EMAIL_WRAP_CHARS: usize = 30;
const SERVICE_TRUNC_CHARS: usize = 26;
const COMMENT_TRUNC_CHARS: usize = 38;

pub const CONFIDENTIAL_LABEL: &str = "Confidential: Service Guidance Platform feedback";
pub const ANONYMOUS_LABEL: &str = "Anonymous";

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FontFace {
  Regular,
  Bold,
  Mono,
}

/// Ink shade; the emit step maps these to gray levels.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Ink {
  Heading,
  Body,
  Muted,
}

#[derive(Clone, Debug)]
pub struct TextOp {
  pub x: f64,
  pub y: f64,
  pub size: f64,
  pub face: FontFace,
  pub ink: Ink,
  pub text: String,
}

#[derive(Copy, Clone, Debug)]
pub struct RuleOp {
  pub y: f64,
  pub x1: f64,
  pub x2: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PageContent {
  pub text: Vec<TextOp>,
  pub rules: Vec<RuleOp>,
}

#[derive(Copy, Clone, Debug)]
pub struct LayoutOptions {
  /// Detail-table row cap; records past it are summarized in a trailing note.
  pub max_rows: usize,
}

impl Default for LayoutOptions {
  fn default() -> Self {
    LayoutOptions { max_rows: 25 }
  }
}

struct Cursor {
  pages: Vec<PageContent>,
  y: f64,
}

impl Cursor {
  fn new() -> Cursor {
    Cursor { pages: vec![PageContent::default()], y: TOP_Y }
  }

  fn page(&mut self) -> &mut PageContent {
    self.pages.last_mut().expect("cursor always owns a page")
  }

  fn break_page(&mut self) {
    self.pages.push(PageContent::default());
    self.y = TOP_Y;
  }

  /// Start a new page when fewer than `needed` millimetres remain.
  fn ensure(&mut self, needed: f64) -> bool {
    if self.y - needed < BOTTOM_Y {
      self.break_page();
      return true;
    }
    false
  }

  fn text(&mut self, x: f64, size: f64, face: FontFace, ink: Ink, text: impl Into<String>) {
    let y = self.y;
    self.page().text.push(TextOp { x, y, size, face, ink, text: text.into() });
  }

  fn rule(&mut self) {
    let y = self.y;
    self.page().rules.push(RuleOp { y, x1: LEFT, x2: RIGHT });
  }

  fn advance(&mut self, dy: f64) {
    self.y -= dy;
  }
}

fn heading(cur: &mut Cursor, title: &str) {
  cur.ensure(LINE_LG + LINE_MD * 2.0);
  cur.advance(LINE_MD);
  cur.text(LEFT, SIZE_HEADING, FontFace::Bold, Ink::Heading, title);
  cur.advance(1.5);
  cur.rule();
  cur.advance(LINE_SM);
}

fn body_line(cur: &mut Cursor, text: String) {
  cur.ensure(LINE_SM);
  cur.text(LEFT + 2.0, SIZE_BODY, FontFace::Regular, Ink::Body, text);
  cur.advance(LINE_SM);
}

/// Display string for a record's creation date; unparseable stamps show a
/// placeholder rather than dropping the row.
pub fn row_date(record: &FeedbackRecord) -> String {
  match timeparse::parse_timestamp(&record.created_at) {
    Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
    None => "-".to_string(),
  }
}

fn distribution_percent(count: usize, total: usize) -> u32 {
  if total == 0 {
    return 0;
  }
  ((count as f64 / total as f64) * 100.0).round() as u32
}

fn table_header(cur: &mut Cursor) {
  cur.ensure(LINE_SM * 2.0);
  cur.text(COL_INDEX_X, SIZE_TABLE, FontFace::Bold, Ink::Muted, "#");
  cur.text(COL_EMAIL_X, SIZE_TABLE, FontFace::Bold, Ink::Muted, "Email");
  cur.text(COL_SERVICE_X, SIZE_TABLE, FontFace::Bold, Ink::Muted, "Service");
  cur.text(COL_STEP_X, SIZE_TABLE, FontFace::Bold, Ink::Muted, "Step");
  cur.text(COL_RATING_X, SIZE_TABLE, FontFace::Bold, Ink::Muted, "Rating");
  cur.text(COL_DATE_X, SIZE_TABLE, FontFace::Bold, Ink::Muted, "Date");
  cur.text(COL_COMMENT_X, SIZE_TABLE, FontFace::Bold, Ink::Muted, "Comment");
  cur.advance(1.5);
  cur.rule();
  cur.advance(LINE_SM);
}

fn table_row(cur: &mut Cursor, index: usize, record: &FeedbackRecord) {
  let email = record.user_email.as_deref().filter(|e| !e.trim().is_empty()).unwrap_or(ANONYMOUS_LABEL);
  let email_lines = wrap_chars(email, EMAIL_WRAP_CHARS);
  let row_advance = MIN_ROW.max(email_lines.len() as f64 * SUB_LINE + (MIN_ROW - SUB_LINE));

  if cur.ensure(row_advance + LINE_SM) {
    table_header(cur);
  }

  let service = truncate_ellipsis(&service_bucket(record), SERVICE_TRUNC_CHARS);
  let step = record.step.map_or_else(|| "-".to_string(), |s| format!("Step {}", s));
  let rating = format!("{}/5", record.rating);
  let comment = record
    .comment
    .as_deref()
    .map_or_else(|| "-".to_string(), |c| truncate_ellipsis(c, COMMENT_TRUNC_CHARS));

  cur.text(COL_INDEX_X, SIZE_TABLE, FontFace::Mono, Ink::Body, format!("{}", index));
  for (i, line) in email_lines.iter().enumerate() {
    let y = cur.y - i as f64 * SUB_LINE;
    let page = cur.page();
    page.text.push(TextOp {
      x: COL_EMAIL_X,
      y,
      size: SIZE_TABLE,
      face: FontFace::Mono,
      ink: Ink::Body,
      text: line.clone(),
    });
  }
  cur.text(COL_SERVICE_X, SIZE_TABLE, FontFace::Mono, Ink::Body, service);
  cur.text(COL_STEP_X, SIZE_TABLE, FontFace::Mono, Ink::Body, step);
  cur.text(COL_RATING_X, SIZE_TABLE, FontFace::Mono, Ink::Body, rating);
  cur.text(COL_DATE_X, SIZE_TABLE, FontFace::Mono, Ink::Body, row_date(record));
  cur.text(COL_COMMENT_X, SIZE_TABLE, FontFace::Mono, Ink::Body, comment);

  cur.advance(row_advance);
}

/// Phase one: lay the report out as content-only page descriptors.
pub fn layout_report(
  stats: &ReportStatistics,
  records: &[FeedbackRecord],
  period_label: &str,
  opts: &LayoutOptions,
) -> Vec<PageContent> {
  let mut cur = Cursor::new();

  // Title band
  cur.text(LEFT, SIZE_TITLE, FontFace::Bold, Ink::Heading, "Feedback Report");
  cur.text(LEFT + 75.0, SIZE_SUBTITLE, FontFace::Regular, Ink::Muted, "Service Guidance Platform");
  cur.advance(LINE_LG);
  cur.rule();
  cur.advance(LINE_MD);
  cur.text(LEFT, SIZE_BODY, FontFace::Regular, Ink::Muted, format!("Period: {}", period_label));
  cur.advance(LINE_LG);

  heading(&mut cur, "Summary");
  body_line(&mut cur, format!("Total feedback: {}", stats.total_valid));
  body_line(&mut cur, format!("Average rating: {:.2} / 5", stats.average_rating));
  body_line(&mut cur, format!("Reporting period: {}", period_label));

  heading(&mut cur, "Rating distribution");
  for rating in (1..=5u8).rev() {
    let count = stats.histogram.get(&rating).copied().unwrap_or(0);
    let pct = distribution_percent(count, stats.total_valid);
    body_line(&mut cur, format!("{} star{}: {} ({}%)", rating, if rating == 1 { "" } else { "s" }, count, pct));
  }

  heading(&mut cur, "Feedback by service");
  if stats.per_service.is_empty() {
    body_line(&mut cur, "No rated feedback in this period".to_string());
  }
  for (service, count) in &stats.per_service {
    body_line(&mut cur, format!("{}: {}", service, count));
  }

  // Detail section always opens a fresh page.
  cur.break_page();
  heading(&mut cur, "Detailed records");
  table_header(&mut cur);

  let shown = records.len().min(opts.max_rows);
  for (i, record) in records.iter().take(shown).enumerate() {
    table_row(&mut cur, i + 1, record);
  }

  let omitted = records.len() - shown;
  if omitted > 0 {
    cur.ensure(LINE_MD + LINE_SM);
    cur.advance(LINE_SM);
    cur.text(
      COL_INDEX_X,
      SIZE_BODY,
      FontFace::Regular,
      Ink::Muted,
      format!("{} additional record{} omitted from this report", omitted, if omitted == 1 { "" } else { "s" }),
    );
    cur.advance(LINE_SM);
  }

  cur.pages
}

/// Phase two: with the final page count known, stamp the confidentiality
/// label and "Page X of N" onto every page.
pub fn stamp_footers(pages: &mut [PageContent]) {
  let total = pages.len();
  for (i, page) in pages.iter_mut().enumerate() {
    page.rules.push(RuleOp { y: FOOTER_RULE_Y, x1: LEFT, x2: RIGHT });
    page.text.push(TextOp {
      x: LEFT,
      y: FOOTER_TEXT_Y,
      size: SIZE_FOOTER,
      face: FontFace::Regular,
      ink: Ink::Muted,
      text: CONFIDENTIAL_LABEL.to_string(),
    });
    page.text.push(TextOp {
      x: RIGHT - 25.0,
      y: FOOTER_TEXT_Y,
      size: SIZE_FOOTER,
      face: FontFace::Regular,
      ink: Ink::Muted,
      text: format!("Page {} of {}", i + 1, total),
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Timestamp;
  use crate::stats::aggregate;

  fn record(i: usize, email: Option<&str>, rating: i64) -> FeedbackRecord {
    FeedbackRecord {
      id: format!("fb-{}", i),
      user_id: Some(format!("u-{}", i)),
      user_email: email.map(|e| e.to_string()),
      service_id: "svc-1".into(),
      service_name: Some("Enrollment".into()),
      step: Some(2),
      rating,
      comment: Some("helpful".into()),
      created_at: Timestamp::Text("2024-05-10T09:30:00".into()),
    }
  }

  fn texts(page: &PageContent) -> Vec<&str> {
    page.text.iter().map(|op| op.text.as_str()).collect()
  }

  fn all_texts(pages: &[PageContent]) -> Vec<&str> {
    pages.iter().flat_map(|p| p.text.iter().map(|op| op.text.as_str())).collect()
  }

  #[test]
  fn summary_page_carries_totals_and_distribution() {
    let records: Vec<_> = (0..3).map(|i| record(i, Some("a@campus.edu"), 5)).collect();
    let stats = aggregate(&records);
    let pages = layout_report(&stats, &records, "May 2024", &LayoutOptions::default());

    let first = texts(&pages[0]);
    assert!(first.contains(&"Feedback Report"));
    assert!(first.contains(&"Period: May 2024"));
    assert!(first.contains(&"Total feedback: 3"));
    assert!(first.contains(&"Average rating: 5.00 / 5"));
    assert!(first.contains(&"5 stars: 3 (100%)"));
    assert!(first.contains(&"1 star: 0 (0%)"));
    assert!(first.contains(&"Enrollment: 3"));
  }

  #[test]
  fn zero_valid_ratings_render_zero_percent() {
    // records exist but none carry a valid rating
    let records = vec![record(0, Some("a@campus.edu"), 0), record(1, None, 6)];
    let stats = aggregate(&records);
    let pages = layout_report(&stats, &records, "May 2024", &LayoutOptions::default());

    let first = texts(&pages[0]);
    assert!(first.contains(&"Total feedback: 0"));
    assert!(first.contains(&"Average rating: 0.00 / 5"));
    assert!(first.contains(&"5 stars: 0 (0%)"));
    // raw rows still render in the detail table
    let all = all_texts(&pages);
    assert!(all.contains(&"0/5"));
    assert!(all.contains(&"6/5"));
  }

  #[test]
  fn detail_section_starts_on_its_own_page() {
    let records = vec![record(0, Some("a@campus.edu"), 4)];
    let stats = aggregate(&records);
    let pages = layout_report(&stats, &records, "May 2024", &LayoutOptions::default());

    assert!(pages.len() >= 2);
    assert!(!texts(&pages[0]).contains(&"Detailed records"));
    assert!(texts(&pages[1]).contains(&"Detailed records"));
    assert!(texts(&pages[1]).contains(&"Anonymous") || texts(&pages[1]).contains(&"a@campus.edu"));
  }

  #[test]
  fn missing_email_renders_anonymous() {
    let records = vec![record(0, None, 4)];
    let stats = aggregate(&records);
    let pages = layout_report(&stats, &records, "May 2024", &LayoutOptions::default());
    assert!(all_texts(&pages).contains(&ANONYMOUS_LABEL));
  }

  #[test]
  fn long_emails_wrap_and_stretch_the_row() {
    let long = "a.very.long.student.address@graduate.school.campus.edu";
    assert!(long.chars().count() > EMAIL_WRAP_CHARS);

    let records = vec![record(0, Some(long), 4), record(1, Some("b@campus.edu"), 4)];
    let stats = aggregate(&records);
    let pages = layout_report(&stats, &records, "May 2024", &LayoutOptions::default());
    let detail = &pages[1];

    // wrapped fragments land as separate ops at the email column
    let email_ops: Vec<_> = detail
      .text
      .iter()
      .filter(|op| op.x == COL_EMAIL_X && op.face == FontFace::Mono)
      .collect();
    assert!(email_ops.len() >= 3, "two lines for the long email, one for the short");

    // the second row starts lower than one minimum row height below the first
    let first_row_y = detail.text.iter().find(|op| op.text == "1").unwrap().y;
    let second_row_y = detail.text.iter().find(|op| op.text == "2").unwrap().y;
    assert!(first_row_y - second_row_y > MIN_ROW);
  }

  #[test]
  fn row_cap_notes_omitted_records() {
    let records: Vec<_> = (0..8).map(|i| record(i, Some("a@campus.edu"), 3)).collect();
    let stats = aggregate(&records);
    let pages = layout_report(&stats, &records, "May 2024", &LayoutOptions { max_rows: 5 });

    let all = all_texts(&pages);
    assert!(all.contains(&"5"));
    assert!(!all.iter().any(|t| t.starts_with("6 ") || *t == "6"), "rows past the cap are not drawn");
    assert!(all.iter().any(|t| t.contains("3 additional records omitted")));
  }

  #[test]
  fn long_tables_paginate_and_redraw_the_header() {
    let records: Vec<_> = (0..120).map(|i| record(i, Some("student@campus.edu"), 4)).collect();
    let stats = aggregate(&records);
    let pages = layout_report(&stats, &records, "Year 2024", &LayoutOptions { max_rows: 120 });

    assert!(pages.len() >= 3, "summary page plus a multi-page table, got {}", pages.len());
    for page in &pages[1..] {
      assert!(texts(page).contains(&"Email"), "column header redrawn on every table page");
    }
  }

  #[test]
  fn footers_stamp_final_page_count_on_every_page() {
    let records: Vec<_> = (0..40).map(|i| record(i, Some("a@campus.edu"), 4)).collect();
    let stats = aggregate(&records);
    let mut pages = layout_report(&stats, &records, "May 2024", &LayoutOptions { max_rows: 40 });
    let total = pages.len();
    stamp_footers(&mut pages);

    for (i, page) in pages.iter().enumerate() {
      let t = texts(page);
      assert!(t.contains(&CONFIDENTIAL_LABEL));
      let expected = format!("Page {} of {}", i + 1, total);
      assert!(t.iter().any(|s| **s == expected), "missing {:?}", expected);
    }
  }

  #[test]
  fn layout_does_not_mutate_inputs() {
    let records = vec![record(0, Some("a@campus.edu"), 4)];
    let stats = aggregate(&records);
    let before = format!("{:?}", records);
    let _ = layout_report(&stats, &records, "May 2024", &LayoutOptions::default());
    assert_eq!(before, format!("{:?}", records));
  }
}
