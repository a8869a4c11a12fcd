//! Stable store keys and storage-root resolution.
//!
//! # Responsibility
//! - Map a record type to a file name that stays stable across builds.
//! - Resolve the application-scoped directory that holds all records.
//!
//! # Invariants
//! - A valid key is one path component: it never contains separators, never
//!   starts or ends with `.`, and never contains `..`.
//! - Keys are compared byte-for-byte. On case-insensitive file systems
//!   (default macOS, Windows) keys differing only in case share one file.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const MAX_KEY_CHARS: usize = 128;

static STORE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").expect("valid store key regex"));

/// Store key validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKeyError {
    Empty,
    TooLong { len: usize, max: usize },
    InvalidCharacters(String),
}

impl Display for StoreKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "store key cannot be empty"),
            Self::TooLong { len, max } => {
                write!(f, "store key is {len} characters long; maximum is {max}")
            }
            Self::InvalidCharacters(value) => write!(
                f,
                "store key `{value}` must match [A-Za-z0-9_][A-Za-z0-9_.-]*, not end with `.` and not contain `..`"
            ),
        }
    }
}

impl Error for StoreKeyError {}

/// Validated identity of one persisted record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoreKey(String);

impl StoreKey {
    /// Validates and wraps `value` (surrounding whitespace is trimmed).
    pub fn new(value: impl AsRef<str>) -> Result<Self, StoreKeyError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(StoreKeyError::Empty);
        }
        let len = trimmed.chars().count();
        if len > MAX_KEY_CHARS {
            return Err(StoreKeyError::TooLong {
                len,
                max: MAX_KEY_CHARS,
            });
        }
        // Windows strips trailing dots, so `a.` and `a` would share a file.
        if !STORE_KEY_RE.is_match(trimmed) || trimmed.contains("..") || trimmed.ends_with('.') {
            return Err(StoreKeyError::InvalidCharacters(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Key declared by a record type through `StoreRecord`.
    pub fn of<T: StoreRecord>() -> Result<Self, StoreKeyError> {
        Self::new(T::STORE_KEY)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoreKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Record type with a canonical store key.
///
/// Keys are spelled out explicitly so renaming or moving the Rust type never
/// orphans data already on disk.
pub trait StoreRecord: Default {
    const STORE_KEY: &'static str;
}

/// Storage root resolution errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageRootError {
    InvalidAppName(StoreKeyError),
    NoDataDir,
}

impl Display for StorageRootError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAppName(err) => write!(f, "invalid application name: {err}"),
            Self::NoDataDir => write!(f, "no per-user data directory is available"),
        }
    }
}

impl Error for StorageRootError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidAppName(err) => Some(err),
            Self::NoDataDir => None,
        }
    }
}

/// Returns `<user data dir>/<app_name>`, the default root for record files.
///
/// The directory is not created here; backends create it on first write.
pub fn default_storage_root(app_name: &str) -> Result<PathBuf, StorageRootError> {
    let app = StoreKey::new(app_name).map_err(StorageRootError::InvalidAppName)?;
    let data_dir = dirs::data_dir().ok_or(StorageRootError::NoDataDir)?;
    Ok(data_dir.join(app.as_str()))
}
