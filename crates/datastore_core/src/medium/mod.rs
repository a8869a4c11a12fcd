//! Path-addressed byte storage media.
//!
//! # Responsibility
//! - Define the primitive operations a persistence medium must offer.
//! - Keep file-system details out of backend/serialization logic.
//!
//! # Invariants
//! - Every operation opens and releases its own handles; nothing is held
//!   between calls.
//! - Failures surface as `std::io::Error`, never as panics.

use std::io;
use std::path::Path;

mod fs;
mod memory;

pub use fs::FileSystem;
pub use memory::MemoryStorage;

/// Byte-level storage primitives addressed by path.
pub trait ByteStorage {
    /// Returns whether a record exists at `path`.
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Creates or truncates `path` and writes all `bytes`.
    fn write_all(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;

    /// Reads the full record stored at `path`.
    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Deletes the record at `path`. Missing records are `NotFound` errors.
    fn delete(&self, path: &Path) -> io::Result<()>;

    /// Moves `from` over `to`, replacing any record already at `to`.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Ensures the directory `path` exists.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}
