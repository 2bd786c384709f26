// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Persisted session key-value state (token, email) behind a narrow get/set/clear interface
// role: session/store
// inputs: Store file path; string keys and values
// outputs: Stored values; JSON file on disk for FileStore
// side_effects: FileStore writes its backing file on set/clear
// invariants:
// - Session state is injected, never ambient global state
// - A missing or unreadable backing file reads as an empty store
// - clear removes the key from disk, not just from memory
// errors: Write failures bubble with path context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const TOKEN_KEY: &str = "token";
pub const EMAIL_KEY: &str = "email";

/// The narrow surface the gate and the data source are allowed to touch.
pub trait SessionStore {
  fn get(&self, key: &str) -> Option<String>;
  fn set(&mut self, key: &str, value: &str) -> Result<()>;
  fn clear(&mut self, key: &str) -> Result<()>;
}

/// JSON-file-backed store; the CLI's stand-in for the portal's persisted
/// local storage.
pub struct FileStore {
  path: PathBuf,
  values: BTreeMap<String, String>,
}

impl FileStore {
  /// Open a store at `path`. A missing file is an empty session, not an
  /// error; sign-in simply has not happened yet.
  pub fn open<P: AsRef<Path>>(path: P) -> Result<FileStore> {
    let path = path.as_ref().to_path_buf();
    let values = match std::fs::read_to_string(&path) {
      Ok(raw) => serde_json::from_str(&raw)
        .with_context(|| format!("parsing session store {}", path.display()))?,
      Err(_) => BTreeMap::new(),
    };
    Ok(FileStore { path, values })
  }

  fn persist(&self) -> Result<()> {
    if let Some(parent) = self.path.parent() {
      if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent)
          .with_context(|| format!("creating session store directory for {}", self.path.display()))?;
      }
    }
    std::fs::write(&self.path, serde_json::to_vec_pretty(&self.values)?)
      .with_context(|| format!("writing session store {}", self.path.display()))
  }
}

impl SessionStore for FileStore {
  fn get(&self, key: &str) -> Option<String> {
    self.values.get(key).cloned()
  }

  fn set(&mut self, key: &str, value: &str) -> Result<()> {
    self.values.insert(key.to_string(), value.to_string());
    self.persist()
  }

  fn clear(&mut self, key: &str) -> Result<()> {
    if self.values.remove(key).is_some() {
      self.persist()?;
    }
    Ok(())
  }
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
  values: BTreeMap<String, String>,
}

#[cfg(test)]
impl SessionStore for MemoryStore {
  fn get(&self, key: &str) -> Option<String> {
    self.values.get(key).cloned()
  }

  fn set(&mut self, key: &str, value: &str) -> Result<()> {
    self.values.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn clear(&mut self, key: &str) -> Result<()> {
    self.values.remove(key);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_reads_as_empty_session() {
    let td = tempfile::TempDir::new().unwrap();
    let store = FileStore::open(td.path().join("session.json")).unwrap();
    assert!(store.get(TOKEN_KEY).is_none());
  }

  #[test]
  fn set_get_clear_roundtrip_persists() {
    let td = tempfile::TempDir::new().unwrap();
    let path = td.path().join("session.json");

    let mut store = FileStore::open(&path).unwrap();
    store.set(TOKEN_KEY, "abc.def.ghi").unwrap();
    store.set(EMAIL_KEY, "staff@campus.edu").unwrap();

    // reopen: values survived the process boundary
    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("abc.def.ghi"));
    assert_eq!(reopened.get(EMAIL_KEY).as_deref(), Some("staff@campus.edu"));

    let mut store = reopened;
    store.clear(TOKEN_KEY).unwrap();
    let reopened = FileStore::open(&path).unwrap();
    assert!(reopened.get(TOKEN_KEY).is_none(), "clear reaches the disk copy");
    assert!(reopened.get(EMAIL_KEY).is_some());
  }

  #[test]
  fn corrupt_store_surfaces_a_parse_error() {
    let td = tempfile::TempDir::new().unwrap();
    let path = td.path().join("session.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(FileStore::open(&path).is_err());
  }

  #[test]
  fn memory_store_matches_the_trait_contract() {
    let mut store = MemoryStore::default();
    assert!(store.get(TOKEN_KEY).is_none());
    store.set(TOKEN_KEY, "t").unwrap();
    assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("t"));
    store.clear(TOKEN_KEY).unwrap();
    assert!(store.get(TOKEN_KEY).is_none());
  }
}
