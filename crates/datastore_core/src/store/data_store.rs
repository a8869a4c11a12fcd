//! Typed in-memory record with a persistence lifecycle.
//!
//! # Responsibility
//! - Own exactly one in-memory instance of `T`.
//! - Translate `save`/`load`/`delete`/`clear` into backend primitives and
//!   collapse their outcomes into plain success flags.
//!
//! # Invariants
//! - `data` is always present; the reset factory's product is the floor.
//! - `data` is replaced only by a successful `load` or by `clear`.
//! - No lifecycle call panics or returns an error; failure detail is kept
//!   out-of-band in `last_error`.

use crate::backend::{Backend, BackendError};
use log::{debug, info, warn};

/// Construction-time policy for `DataStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Try `load` during construction; fall back to a reset record on failure.
    pub load_on_initialize: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            load_on_initialize: true,
        }
    }
}

type ResetFactory<T> = Box<dyn Fn() -> T>;

/// Single typed record kept in memory and mirrored to a backend on demand.
pub struct DataStore<T, B> {
    data: T,
    backend: B,
    reset: ResetFactory<T>,
    last_error: Option<BackendError>,
}

impl<T, B> DataStore<T, B>
where
    T: Default + 'static,
    B: Backend<T>,
{
    /// Creates a store with default options (`load_on_initialize = true`).
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, StoreOptions::default())
    }

    pub fn with_options(backend: B, options: StoreOptions) -> Self {
        Self::with_factory(backend, options, T::default)
    }
}

impl<T, B> DataStore<T, B>
where
    B: Backend<T>,
{
    /// Creates a store whose `clear` produces values from `factory`.
    ///
    /// # Contract
    /// - With `load_on_initialize`, a persisted record replaces the initial
    ///   value; any load failure leaves the factory's value in place.
    /// - Without it, the store starts from the factory's value and the
    ///   backend is not touched.
    pub fn with_factory(
        backend: B,
        options: StoreOptions,
        factory: impl Fn() -> T + 'static,
    ) -> Self {
        let mut store = Self {
            data: factory(),
            backend,
            reset: Box::new(factory),
            last_error: None,
        };

        let loaded = options.load_on_initialize && store.load();
        if options.load_on_initialize && !loaded {
            store.clear(false);
        }
        info!(
            "event=store_init module=store status=ok load_on_initialize={} loaded={}",
            options.load_on_initialize, loaded
        );
        store
    }

    /// Persists the current record. Leaves `data` untouched.
    pub fn save(&mut self) -> bool {
        let result = self.backend.persist(&self.data);
        self.track("save", result)
    }

    /// Replaces `data` with the persisted record.
    ///
    /// Returns `false` when nothing is persisted or the backend fails; `data`
    /// is left unchanged in both cases.
    pub fn load(&mut self) -> bool {
        match self.backend.retrieve() {
            Ok(Some(data)) => {
                self.data = data;
                self.track("load", Ok(()))
            }
            Ok(None) => {
                self.last_error = None;
                debug!("event=store_load module=store status=absent");
                false
            }
            Err(err) => self.track("load", Err(err)),
        }
    }

    /// Deletes the persisted record. Deleting nothing counts as success.
    ///
    /// The in-memory record is not reset; use `clear` for that.
    pub fn delete(&mut self) -> bool {
        let result = self.backend.remove();
        self.track("delete", result)
    }

    /// Resets `data` to a fresh value, then saves it when `persist` is set.
    ///
    /// The save outcome is not returned; check `last_error` if it matters.
    pub fn clear(&mut self, persist: bool) {
        self.data = (self.reset)();
        if persist {
            self.save();
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Failure detail of the latest lifecycle call, if it failed with a fault.
    pub fn last_error(&self) -> Option<&BackendError> {
        self.last_error.as_ref()
    }

    fn track(&mut self, operation: &str, result: Result<(), BackendError>) -> bool {
        match result {
            Ok(()) => {
                self.last_error = None;
                debug!("event=store_{operation} module=store status=ok");
                true
            }
            Err(err) => {
                warn!(
                    "event=store_{operation} module=store status=error error_code={} error={}",
                    err.code(),
                    err
                );
                self.last_error = Some(err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DataStore, StoreOptions};
    use crate::backend::{Backend, BackendError, BackendResult};
    use std::cell::{Cell, RefCell};
    use std::io::{self, ErrorKind};
    use std::rc::Rc;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Counter {
        value: i64,
    }

    /// Backend whose next call can be forced to fail.
    #[derive(Default)]
    struct ScriptedBackend {
        record: RefCell<Option<Counter>>,
        fail_next: Cell<bool>,
        calls: Cell<u32>,
    }

    impl ScriptedBackend {
        fn with_record(value: i64) -> Self {
            let backend = Self::default();
            *backend.record.borrow_mut() = Some(Counter { value });
            backend
        }

        fn injected(&self) -> BackendResult<()> {
            self.calls.set(self.calls.get() + 1);
            if self.fail_next.replace(false) {
                return Err(BackendError::io(
                    "/scripted",
                    io::Error::new(ErrorKind::PermissionDenied, "injected failure"),
                ));
            }
            Ok(())
        }
    }

    impl Backend<Counter> for ScriptedBackend {
        fn persist(&self, data: &Counter) -> BackendResult<()> {
            self.injected()?;
            *self.record.borrow_mut() = Some(data.clone());
            Ok(())
        }

        fn retrieve(&self) -> BackendResult<Option<Counter>> {
            self.injected()?;
            Ok(self.record.borrow().clone())
        }

        fn remove(&self) -> BackendResult<()> {
            self.injected()?;
            *self.record.borrow_mut() = None;
            Ok(())
        }
    }

    #[test]
    fn construction_loads_existing_record() {
        let store = DataStore::new(ScriptedBackend::with_record(9));
        assert_eq!(store.data().value, 9);
        assert!(store.last_error().is_none());
    }

    #[test]
    fn construction_without_load_never_touches_backend() {
        let store = DataStore::with_options(
            ScriptedBackend::with_record(9),
            StoreOptions {
                load_on_initialize: false,
            },
        );
        assert_eq!(store.data(), &Counter::default());
        assert_eq!(store.backend().calls.get(), 0);
    }

    #[test]
    fn failed_initial_load_falls_back_to_default() {
        let backend = ScriptedBackend::with_record(9);
        backend.fail_next.set(true);

        let store = DataStore::new(backend);

        assert_eq!(store.data(), &Counter::default());
        assert!(store.last_error().is_some());
    }

    #[test]
    fn failed_save_keeps_data_and_reports_false() {
        let mut store = DataStore::new(ScriptedBackend::default());
        store.data_mut().value = 5;
        store.backend().fail_next.set(true);

        assert!(!store.save());
        assert_eq!(store.data().value, 5);
        assert_eq!(store.last_error().map(BackendError::code), Some("io_failed"));

        assert!(store.save());
        assert!(store.last_error().is_none());
    }

    #[test]
    fn failed_load_leaves_data_unchanged() {
        let mut store = DataStore::new(ScriptedBackend::with_record(1));
        store.data_mut().value = 77;
        store.backend().fail_next.set(true);

        assert!(!store.load());
        assert_eq!(store.data().value, 77);
    }

    #[test]
    fn delete_does_not_reset_memory() {
        let mut store = DataStore::new(ScriptedBackend::with_record(3));

        assert!(store.delete());
        assert_eq!(store.data().value, 3);
        assert!(store.backend().record.borrow().is_none());
    }

    #[test]
    fn clear_uses_injected_factory() {
        let produced = Rc::new(Cell::new(0));
        let counter = Rc::clone(&produced);
        let mut store = DataStore::with_factory(
            ScriptedBackend::default(),
            StoreOptions {
                load_on_initialize: false,
            },
            move || {
                counter.set(counter.get() + 1);
                Counter { value: -1 }
            },
        );
        store.data_mut().value = 10;

        store.clear(false);

        assert_eq!(store.data().value, -1);
        assert_eq!(produced.get(), 2);
        assert!(store.backend().record.borrow().is_none());
    }

    #[test]
    fn clear_with_persist_swallows_save_failure() {
        let mut store = DataStore::new(ScriptedBackend::with_record(4));
        store.backend().fail_next.set(true);

        store.clear(true);

        assert_eq!(store.data(), &Counter::default());
        assert!(store.last_error().is_some());
        assert_eq!(store.backend().record.borrow().as_ref().map(|c| c.value), Some(4));
    }
}
