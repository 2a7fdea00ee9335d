//! Durable registry snapshots.
//!
//! A snapshot is a single JSON document:
//!
//! ```text
//! {
//!   "format": 1,
//!   "checksum": "<blake3 hex of the state>",
//!   "state": { ... }
//! }
//! ```
//!
//! The checksum covers the serialized state under a domain separator, so a
//! hand-edited file is refused on load instead of silently breaking the
//! registry's invariants.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{RegistryError, Result};
use crate::state::RegistryState;

/// Current on-disk format version.
pub const SNAPSHOT_FORMAT: u32 = 1;

const CHECKSUM_DOMAIN: &[u8] = b"deed-snapshot-v1:";

/// Registry state together with its integrity metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub format: u32,
    pub checksum: String,
    pub state: RegistryState,
}

impl RegistrySnapshot {
    /// Wrap a state and compute its checksum.
    pub fn new(state: RegistryState) -> Result<Self> {
        let checksum = checksum(&state)?;
        Ok(Self {
            format: SNAPSHOT_FORMAT,
            checksum,
            state,
        })
    }

    /// Verify format, checksum and invariants, then hand back the state.
    pub fn into_verified_state(self) -> Result<RegistryState> {
        if self.format != SNAPSHOT_FORMAT {
            return Err(RegistryError::Snapshot(format!(
                "unsupported snapshot format {}",
                self.format
            )));
        }
        if checksum(&self.state)? != self.checksum {
            return Err(RegistryError::ChecksumMismatch);
        }
        self.state
            .check_invariants()
            .map_err(RegistryError::Snapshot)?;
        Ok(self.state)
    }
}

fn checksum(state: &RegistryState) -> Result<String> {
    let body = serde_json::to_vec(state).map_err(|e| RegistryError::Snapshot(e.to_string()))?;
    let mut hasher = blake3::Hasher::new();
    hasher.update(CHECKSUM_DOMAIN);
    hasher.update(&body);
    Ok(hasher.finalize().to_hex().to_string())
}

/// Write `state` to `path`.
///
/// The snapshot goes to a sibling temporary file first and is renamed into
/// place, so a crash mid-write leaves the previous snapshot intact.
pub fn save(path: impl AsRef<Path>, state: &RegistryState) -> Result<()> {
    let path = path.as_ref();
    let snapshot = RegistrySnapshot::new(state.clone())?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    let written = write_file(tmp, &snapshot)
        .and_then(|()| fs::rename(tmp, path).map_err(RegistryError::from));
    if let Err(e) = written {
        // The temporary file may not exist yet.
        let _ = fs::remove_file(tmp);
        return Err(e);
    }

    debug!(
        path = %path.display(),
        properties = state.properties.len(),
        checksum = %snapshot.checksum,
        "snapshot saved"
    );
    Ok(())
}

fn write_file(path: &Path, snapshot: &RegistrySnapshot) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot)
        .map_err(|e| RegistryError::Snapshot(e.to_string()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

/// Read and verify a snapshot from `path`.
pub fn load(path: impl AsRef<Path>) -> Result<RegistryState> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let snapshot: RegistrySnapshot =
        serde_json::from_str(&text).map_err(|e| RegistryError::Snapshot(e.to_string()))?;

    match snapshot.into_verified_state() {
        Ok(state) => {
            debug!(
                path = %path.display(),
                properties = state.properties.len(),
                "snapshot loaded"
            );
            Ok(state)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "snapshot refused");
            Err(e)
        }
    }
}

/// Like [`load`], but a missing file yields `None`.
pub fn load_if_exists(path: impl AsRef<Path>) -> Result<Option<RegistryState>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    load(path).map(Some)
}
