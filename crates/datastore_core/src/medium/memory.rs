//! In-process byte storage.
//!
//! Clones share one underlying map, so several stores built over clones of
//! the same `MemoryStorage` address the same records.

use super::ByteStorage;
use std::collections::HashMap;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

type Records = HashMap<PathBuf, Vec<u8>>;

/// `ByteStorage` kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: Arc<Mutex<Records>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places raw bytes at `path`, bypassing any codec.
    pub fn insert(&self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> io::Result<()> {
        self.lock()?.insert(path.into(), bytes.into());
        Ok(())
    }

    /// Returns a copy of the raw bytes at `path`.
    pub fn get(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        Ok(self.lock()?.get(path).cloned())
    }

    /// Returns stored paths in sorted order.
    pub fn paths(&self) -> io::Result<Vec<PathBuf>> {
        let mut paths = self.lock()?.keys().cloned().collect::<Vec<_>>();
        paths.sort();
        Ok(paths)
    }

    pub fn len(&self) -> io::Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> io::Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Records>> {
        self.records
            .lock()
            .map_err(|_| io::Error::other("memory storage lock poisoned"))
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        ErrorKind::NotFound,
        format!("no record at `{}`", path.display()),
    )
}

impl ByteStorage for MemoryStorage {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        Ok(self.lock()?.contains_key(path))
    }

    fn write_all(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        self.lock()?.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.lock()?.get(path).cloned().ok_or_else(|| not_found(path))
    }

    fn delete(&self, path: &Path) -> io::Result<()> {
        self.lock()?
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| not_found(path))
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut records = self.lock()?;
        let bytes = records.remove(from).ok_or_else(|| not_found(from))?;
        records.insert(to.to_path_buf(), bytes);
        Ok(())
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}
