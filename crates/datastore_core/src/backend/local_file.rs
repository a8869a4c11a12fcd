//! Single-file snapshot backend.
//!
//! # Responsibility
//! - Persist one whole record per store key as `<root>/<key>`.
//! - Encode/decode through a pluggable `Codec`, write through a pluggable
//!   `ByteStorage` medium.
//!
//! # Invariants
//! - The record path is derived only from `root` and the validated key.
//! - Every failure is logged with key, path and cause before it is returned.
//! - `WriteMode::Direct` overwrites in place; a crash mid-write may leave a
//!   truncated record. `WriteMode::Atomic` writes a hidden sibling and
//!   renames it over the record.

use super::{Backend, BackendError, BackendResult};
use crate::codec::{Codec, JsonCodec};
use crate::key::{StoreKey, StoreKeyError, StoreRecord};
use crate::medium::{ByteStorage, FileSystem};
use log::{debug, error, warn};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

/// How `persist` replaces the record on the medium.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Create/truncate the record file and write into it.
    #[default]
    Direct,
    /// Write a temp sibling, then rename it over the record.
    Atomic,
}

impl WriteMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Atomic => "atomic",
        }
    }
}

/// Tuning knobs for `LocalFileBackend`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalFileOptions {
    pub write_mode: WriteMode,
}

/// Backend storing one serialized snapshot of `T` in a single file.
pub struct LocalFileBackend<T, C = JsonCodec, S = FileSystem> {
    root: PathBuf,
    key: StoreKey,
    codec: C,
    storage: S,
    options: LocalFileOptions,
    _record: PhantomData<fn() -> T>,
}

impl<T> LocalFileBackend<T> {
    /// JSON snapshot of `T` at `<root>/<key>` on the real file system.
    pub fn new(root: impl Into<PathBuf>, key: StoreKey) -> Self {
        Self::with_parts(root, key, JsonCodec::new(), FileSystem)
    }
}

impl<T: StoreRecord> LocalFileBackend<T> {
    /// Same as `new`, keyed by `T::STORE_KEY`.
    pub fn for_record(root: impl Into<PathBuf>) -> Result<Self, StoreKeyError> {
        Ok(Self::new(root, StoreKey::of::<T>()?))
    }
}

impl<T, C, S> LocalFileBackend<T, C, S> {
    pub fn with_parts(root: impl Into<PathBuf>, key: StoreKey, codec: C, storage: S) -> Self {
        Self {
            root: root.into(),
            key,
            codec,
            storage,
            options: LocalFileOptions::default(),
            _record: PhantomData,
        }
    }

    pub fn with_options(mut self, options: LocalFileOptions) -> Self {
        self.options = options;
        self
    }

    /// Full path of the record file.
    pub fn path(&self) -> PathBuf {
        self.root.join(self.key.as_str())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn key(&self) -> &StoreKey {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn options(&self) -> LocalFileOptions {
        self.options
    }

    // Keys never start with `.`, so temp names cannot shadow a record.
    fn temp_path(&self) -> PathBuf {
        self.root
            .join(format!(".{}.{}.tmp", self.key, Uuid::new_v4().simple()))
    }

    fn log_failure(&self, event: &str, path: &Path, started_at: Instant, err: &BackendError) {
        error!(
            "event={} module=backend status=error key={} path={} duration_ms={} error_code={} error={}",
            event,
            self.key,
            path.display(),
            started_at.elapsed().as_millis(),
            err.code(),
            err
        );
    }
}

impl<T, C, S> LocalFileBackend<T, C, S>
where
    C: Codec<T>,
    S: ByteStorage,
{
    fn write_record(&self, data: &T, path: &Path) -> BackendResult<()> {
        let bytes = self.codec.encode(data)?;
        self.storage
            .create_dir_all(&self.root)
            .map_err(|err| BackendError::io(&self.root, err))?;

        match self.options.write_mode {
            WriteMode::Direct => self
                .storage
                .write_all(path, &bytes)
                .map_err(|err| BackendError::io(path, err)),
            WriteMode::Atomic => {
                let temp_path = self.temp_path();
                let replaced = self
                    .storage
                    .write_all(&temp_path, &bytes)
                    .map_err(|err| BackendError::io(&temp_path, err))
                    .and_then(|()| {
                        self.storage
                            .rename(&temp_path, path)
                            .map_err(|err| BackendError::io(path, err))
                    });
                if replaced.is_err() {
                    self.discard_temp(&temp_path);
                }
                replaced
            }
        }
    }

    fn discard_temp(&self, temp_path: &Path) {
        if let Ok(true) = self.storage.exists(temp_path) {
            if let Err(err) = self.storage.delete(temp_path) {
                warn!(
                    "event=store_persist module=backend status=cleanup_failed key={} path={} error={}",
                    self.key,
                    temp_path.display(),
                    err
                );
            }
        }
    }

    fn read_record(&self, path: &Path) -> BackendResult<Option<T>> {
        let exists = self
            .storage
            .exists(path)
            .map_err(|err| BackendError::io(path, err))?;
        if !exists {
            return Ok(None);
        }

        let bytes = self
            .storage
            .read_all(path)
            .map_err(|err| BackendError::io(path, err))?;
        let data = self
            .codec
            .decode(&bytes)
            .map_err(|err| BackendError::decode(path, err))?;
        Ok(Some(data))
    }

    fn remove_record(&self, path: &Path) -> BackendResult<()> {
        let exists = self
            .storage
            .exists(path)
            .map_err(|err| BackendError::io(path, err))?;
        if !exists {
            return Ok(());
        }

        self.storage
            .delete(path)
            .map_err(|err| BackendError::io(path, err))
    }
}

impl<T, C, S> Backend<T> for LocalFileBackend<T, C, S>
where
    C: Codec<T>,
    S: ByteStorage,
{
    fn persist(&self, data: &T) -> BackendResult<()> {
        let started_at = Instant::now();
        let path = self.path();

        match self.write_record(data, &path) {
            Ok(()) => {
                debug!(
                    "event=store_persist module=backend status=ok key={} mode={} duration_ms={}",
                    self.key,
                    self.options.write_mode.as_str(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                self.log_failure("store_persist", &path, started_at, &err);
                Err(err)
            }
        }
    }

    fn retrieve(&self) -> BackendResult<Option<T>> {
        let started_at = Instant::now();
        let path = self.path();

        match self.read_record(&path) {
            Ok(Some(data)) => {
                debug!(
                    "event=store_retrieve module=backend status=ok key={} duration_ms={}",
                    self.key,
                    started_at.elapsed().as_millis()
                );
                Ok(Some(data))
            }
            Ok(None) => {
                debug!(
                    "event=store_retrieve module=backend status=absent key={} path={}",
                    self.key,
                    path.display()
                );
                Ok(None)
            }
            Err(err) => {
                self.log_failure("store_retrieve", &path, started_at, &err);
                Err(err)
            }
        }
    }

    fn remove(&self) -> BackendResult<()> {
        let started_at = Instant::now();
        let path = self.path();

        match self.remove_record(&path) {
            Ok(()) => {
                debug!(
                    "event=store_remove module=backend status=ok key={} duration_ms={}",
                    self.key,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                self.log_failure("store_remove", &path, started_at, &err);
                Err(err)
            }
        }
    }
}
