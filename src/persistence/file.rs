//! File-backed gateway: one JSON file per key inside a data directory

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::debug;

use super::PersistenceGateway;
use crate::error::TimerError;

/// Stores each key as `<dir>/<key>.json`
///
/// Reads and writes are blocking `std::fs` calls made under the store lock
/// on tokio worker threads. Each write is one small file plus a rename; a
/// collection large enough to make that slow needs its persist moved onto
/// `tokio::task::spawn_blocking`.
#[derive(Debug, Clone)]
pub struct FileGateway {
    dir: PathBuf,
}

impl FileGateway {
    /// Use `dir` as the storage namespace, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, TimerError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            TimerError::PersistenceWrite(format!(
                "Failed to create data directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl PersistenceGateway for FileGateway {
    fn get(&self, key: &str) -> Result<Option<String>, TimerError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TimerError::StorageCorrupt(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TimerError> {
        let path = self.path_for(key);
        // Write next to the target, then rename so a crash never leaves half a file
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value).map_err(|e| {
            TimerError::PersistenceWrite(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &path).map_err(|e| {
            TimerError::PersistenceWrite(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        debug!("Saved {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}
