// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Resolve the full dataset (feedback records + services) from a JSON export or the platform REST API
// role: data-source/io
// inputs: SourceSpec (export file paths, or API base URL + session store path)
// outputs: Dataset; complete or an error, never partial
// side_effects: Network calls on the Api path; clears the stored token when the gate says so
// invariants:
// - The role gate runs before any network call; non-permit outcomes abort the fetch
// - A returned Dataset is fully resolved; downstream code never sees a half-loaded snapshot
// - Service-name backfill only fills blanks, it never overwrites upstream names
// errors: File/parse/HTTP failures bubble with path or URL context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::model::{FeedbackRecord, ServiceRecord};
use crate::session::{ADMIN_REPORTS_PATH, Access, authorize};
use crate::store::{EMAIL_KEY, FileStore, SessionStore, TOKEN_KEY};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SourceSpec {
  File { records: PathBuf, services: Option<PathBuf> },
  Api { base: String, session: PathBuf },
}

#[derive(Debug)]
pub struct Dataset {
  pub records: Vec<FeedbackRecord>,
  pub services: Vec<ServiceRecord>,
}

/// Load the dataset for a run. Either path returns a complete snapshot; the
/// report pipeline never runs against partially loaded data.
pub fn load(spec: &SourceSpec) -> Result<Dataset> {
  let mut dataset = match spec {
    SourceSpec::File { records, services } => load_files(records, services.as_deref())?,
    SourceSpec::Api { base, session } => fetch_api(base, session)?,
  };
  backfill_service_names(&mut dataset.records, &dataset.services);
  Ok(dataset)
}

fn load_files(records_path: &Path, services_path: Option<&Path>) -> Result<Dataset> {
  let raw = std::fs::read_to_string(records_path)
    .with_context(|| format!("reading feedback export {}", records_path.display()))?;
  let records: Vec<FeedbackRecord> =
    serde_json::from_str(&raw).with_context(|| format!("parsing feedback export {}", records_path.display()))?;

  let services = match services_path {
    None => Vec::new(),
    Some(path) => {
      let raw = std::fs::read_to_string(path).with_context(|| format!("reading services export {}", path.display()))?;
      serde_json::from_str(&raw).with_context(|| format!("parsing services export {}", path.display()))?
    }
  };

  Ok(Dataset { records, services })
}

fn fetch_api(base: &str, session_path: &Path) -> Result<Dataset> {
  let mut store = FileStore::open(session_path)?;
  let token = store.get(TOKEN_KEY);

  let decision = authorize(token.as_deref(), ADMIN_REPORTS_PATH);
  if decision.clear_token {
    store.clear(TOKEN_KEY)?;
    eprintln!("[session] Stored token failed to decode; signed out");
  }
  match decision.access {
    Access::Permit => {}
    Access::RedirectHome => bail!("not signed in; the feedback API requires an administrator session"),
    Access::Redirect { area, notice } => {
      eprintln!("[session] {}", notice);
      eprintln!("[session] This account belongs in {}", area.home());
      bail!("this account cannot access the feedback API");
    }
  }

  if let Some(email) = store.get(EMAIL_KEY) {
    eprintln!("[session] Signed in as {}", email);
  }

  let token = token.expect("permit implies a token");
  let base = base.trim_end_matches('/');

  let records: Vec<FeedbackRecord> = get_json(&format!("{}/feedback", base), &token)?;
  let services: Vec<ServiceRecord> = get_json(&format!("{}/services", base), &token)?;

  Ok(Dataset { records, services })
}

fn get_json<T: serde::de::DeserializeOwned>(url: &str, token: &str) -> Result<T> {
  let resp = ureq::get(url)
    .set("Authorization", &format!("Bearer {}", token))
    .set("Accept", "application/json")
    .call()
    .with_context(|| format!("fetching {}", url))?;

  resp.into_json().with_context(|| format!("decoding response from {}", url))
}

/// Records persisted before the service-name column existed arrive with a
/// blank name; take it from the service collection when the id matches.
pub fn backfill_service_names(records: &mut [FeedbackRecord], services: &[ServiceRecord]) {
  if services.is_empty() {
    return;
  }
  for record in records.iter_mut() {
    let blank = record.service_name.as_deref().map_or(true, |n| n.trim().is_empty());
    if !blank {
      continue;
    }
    if let Some(svc) = services.iter().find(|s| s.id == record.service_id) {
      record.service_name = Some(svc.name.clone());
    }
  }
}
