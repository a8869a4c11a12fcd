//! Typed single-record persistence for applications.
//!
//! A `DataStore<T, B>` owns one in-memory `T` and mirrors it to any
//! `Backend<T>` on explicit `save`/`load`/`delete`/`clear` calls. The bundled
//! `LocalFileBackend` keeps one serialized snapshot per store key.

pub mod backend;
pub mod codec;
pub mod key;
pub mod logging;
pub mod medium;
pub mod store;

pub use backend::{
    Backend, BackendError, BackendResult, LocalFileBackend, LocalFileOptions, WriteMode,
};
pub use codec::{Codec, CodecError, JsonCodec};
pub use key::{default_storage_root, StorageRootError, StoreKey, StoreKeyError, StoreRecord};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use medium::{ByteStorage, FileSystem, MemoryStorage};
pub use store::data_store::{DataStore, StoreOptions};

/// Minimal health-check API for smoke probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
