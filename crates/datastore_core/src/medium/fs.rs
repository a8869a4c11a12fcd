//! Local file-system medium.

use super::ByteStorage;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// `ByteStorage` over the process's real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystem;

impl ByteStorage for FileSystem {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }

    fn write_all(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        // File handle is dropped (closed) on every return path.
        let mut file = File::create(path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn delete(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}
