//! File-backed snapshot store.
//!
//! ## File Format
//!
//! One file per snapshot, named `{term:016x}-{index:016x}.snap` so that
//! lexical order is snapshot order. Contents:
//!
//! ```text
//! {"term":1,"index":42,"len":1234}\n
//! <len bytes of store payload>
//! ```
//!
//! Writes go to `.snap.tmp` and are renamed into place after `sync_all`.
//! `load` returns the newest file that decodes; broken files are skipped
//! with a warning.

use crate::domain::{Snapshot, SnapshotMetadata, SnapshotStoreError};
use crate::ports::SnapshotStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const SNAPSHOT_EXT: &str = "snap";

/// Default number of snapshot files kept on disk.
pub const DEFAULT_RETAINED_SNAPSHOTS: usize = 5;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotHeader {
    term: u64,
    index: u64,
    len: u64,
}

pub struct FileSnapshotStore {
    dir: PathBuf,
    retain: usize,
}

impl FileSnapshotStore {
    /// Open (creating if needed) a snapshot directory.
    pub fn open(dir: impl Into<PathBuf>, retain: usize) -> Result<Self, SnapshotStoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| SnapshotStoreError::io(&dir, e))?;
        Ok(Self {
            dir,
            retain: retain.max(1),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(metadata: &SnapshotMetadata) -> String {
        format!(
            "{:016x}-{:016x}.{}",
            metadata.term, metadata.index, SNAPSHOT_EXT
        )
    }

    /// Snapshot files, oldest first.
    fn snapshot_files(&self) -> Result<Vec<PathBuf>, SnapshotStoreError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| SnapshotStoreError::io(&self.dir, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SnapshotStoreError::io(&self.dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(SNAPSHOT_EXT) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn read_snapshot(path: &Path) -> Result<Snapshot, SnapshotStoreError> {
        let bytes = fs::read(path).map_err(|e| SnapshotStoreError::io(path, e))?;
        decode(&bytes).map_err(|reason| SnapshotStoreError::Malformed {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn prune(&self) -> Result<(), SnapshotStoreError> {
        let files = self.snapshot_files()?;
        let excess = files.len().saturating_sub(self.retain);
        for path in files.into_iter().take(excess) {
            debug!(path = %path.display(), "Removing old snapshot");
            fs::remove_file(&path).map_err(|e| SnapshotStoreError::io(&path, e))?;
        }
        Ok(())
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>, SnapshotStoreError> {
        for path in self.snapshot_files()?.into_iter().rev() {
            match Self::read_snapshot(&path) {
                Ok(snapshot) => return Ok(Some(snapshot)),
                Err(e) => warn!(error = %e, "Skipping unreadable snapshot"),
            }
        }
        Ok(None)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotStoreError> {
        let final_path = self.dir.join(Self::file_name(&snapshot.metadata));
        let tmp_path = final_path.with_extension("snap.tmp");

        let encoded = encode(snapshot).map_err(|reason| SnapshotStoreError::Malformed {
            path: final_path.clone(),
            reason,
        })?;

        {
            let mut file =
                fs::File::create(&tmp_path).map_err(|e| SnapshotStoreError::io(&tmp_path, e))?;
            file.write_all(&encoded)
                .map_err(|e| SnapshotStoreError::io(&tmp_path, e))?;
            file.sync_all()
                .map_err(|e| SnapshotStoreError::io(&tmp_path, e))?;
        }
        fs::rename(&tmp_path, &final_path).map_err(|e| SnapshotStoreError::io(&final_path, e))?;

        info!(
            index = snapshot.metadata.index,
            term = snapshot.metadata.term,
            bytes = snapshot.data.len(),
            "Saved snapshot"
        );

        self.prune()
    }
}

fn encode(snapshot: &Snapshot) -> Result<Vec<u8>, String> {
    let header = SnapshotHeader {
        term: snapshot.metadata.term,
        index: snapshot.metadata.index,
        len: snapshot.data.len() as u64,
    };
    let mut out = serde_json::to_vec(&header).map_err(|e| e.to_string())?;
    out.push(b'\n');
    out.extend_from_slice(&snapshot.data);
    Ok(out)
}

fn decode(bytes: &[u8]) -> Result<Snapshot, String> {
    let newline = bytes
        .iter()
        .position(|b| *b == b'\n')
        .ok_or_else(|| "missing header line".to_string())?;
    let header: SnapshotHeader =
        serde_json::from_slice(&bytes[..newline]).map_err(|e| format!("bad header: {e}"))?;
    let data = &bytes[newline + 1..];
    if data.len() as u64 != header.len {
        return Err(format!(
            "payload length {} does not match header length {}",
            data.len(),
            header.len
        ));
    }
    Ok(Snapshot {
        metadata: SnapshotMetadata {
            index: header.index,
            term: header.term,
        },
        data: data.to_vec(),
    })
}
