use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::domain::Grant;

const STORE_VERSION: u32 = 1;

/// On-disk shape: the whole collection as one versioned JSON document.
#[derive(Debug, Serialize, Deserialize)]
struct StoreEnvelope {
    version: u32,
    grants: Vec<Grant>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access store file: {0}")]
    Io(#[from] io::Error),
    #[error("store file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported store version {found} (expected {STORE_VERSION})")]
    UnsupportedVersion { found: u32 },
}

/// Opaque durable mapping for the grant collection. Whole-collection reads
/// and writes; callers never see the storage representation.
pub trait GrantStore: Send + Sync {
    fn load(&self) -> Result<Vec<Grant>, StoreError>;
    fn save(&self, grants: &[Grant]) -> Result<(), StoreError>;
}

/// File-backed store. A missing file loads as an empty collection; writes
/// go through a temp file and rename so a crash never truncates the data.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GrantStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Grant>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let envelope: StoreEnvelope = serde_json::from_str(&raw)?;
        if envelope.version != STORE_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: envelope.version,
            });
        }
        Ok(envelope.grants)
    }

    fn save(&self, grants: &[Grant]) -> Result<(), StoreError> {
        let envelope = StoreEnvelope {
            version: STORE_VERSION,
            grants: grants.to_vec(),
        };
        let raw = serde_json::to_string_pretty(&envelope)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Volatile store used by tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    grants: Mutex<Vec<Grant>>,
}

impl GrantStore for InMemoryStore {
    fn load(&self) -> Result<Vec<Grant>, StoreError> {
        Ok(self.grants.lock().expect("store mutex poisoned").clone())
    }

    fn save(&self, grants: &[Grant]) -> Result<(), StoreError> {
        *self.grants.lock().expect("store mutex poisoned") = grants.to_vec();
        Ok(())
    }
}
