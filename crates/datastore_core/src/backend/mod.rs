//! Persistence backend contract.
//!
//! # Responsibility
//! - Define the three fallible primitives every persistence medium provides.
//! - Carry enough failure detail for diagnostics without leaking medium
//!   specifics into the data store.
//!
//! # Invariants
//! - Backends never touch a store's in-memory data.
//! - A missing record is `Ok(None)` from `retrieve`, and `Ok(())` from
//!   `remove`; it is never an error.
//! - Backends contain every medium/codec fault and return it as
//!   `BackendError`; they never panic.

use crate::codec::CodecError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod local_file;

pub use local_file::{LocalFileBackend, LocalFileOptions, WriteMode};

pub type BackendResult<T> = Result<T, BackendError>;

/// Failure raised by a persistence backend.
#[derive(Debug)]
pub enum BackendError {
    /// Medium-level failure (permissions, disk, path).
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The in-memory value could not be serialized.
    Encode(CodecError),
    /// Stored content is malformed or incompatible.
    Decode { path: PathBuf, source: CodecError },
}

impl BackendError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn decode(path: impl Into<PathBuf>, source: CodecError) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    /// Stable short code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io_failed",
            Self::Encode(_) => "encode_failed",
            Self::Decode { .. } => "decode_failed",
        }
    }
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "I/O error at {}: {source}", path.display()),
            Self::Encode(err) => write!(f, "failed to encode record: {err}"),
            Self::Decode { path, source } => {
                write!(f, "failed to decode record at {}: {source}", path.display())
            }
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            Self::Decode { source, .. } => Some(source),
        }
    }
}

impl From<CodecError> for BackendError {
    fn from(value: CodecError) -> Self {
        Self::Encode(value)
    }
}

/// Durable storage for one whole record of type `T`.
pub trait Backend<T> {
    /// Writes `data` durably, replacing any previous record.
    fn persist(&self, data: &T) -> BackendResult<()>;

    /// Reads the record back. `Ok(None)` when nothing has been persisted.
    fn retrieve(&self) -> BackendResult<Option<T>>;

    /// Deletes the record if present.
    fn remove(&self) -> BackendResult<()>;
}
