//! Driver Registry
//!
//! Central registry mapping logical driver names to their guarding
//! decorators. Decorators are stored twice: under a namespaced identifier
//! (so the wrapped registration never collides with a raw vendor
//! registration of the same name) and under the plain name for facade
//! lookup and option introspection. A single read-write lock serializes
//! registration against lookups.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::driver::error::{DriverError, DriverResult};
use crate::driver::traits::{Connection, SqlDriver};
use crate::driver::wrapper::{GuardedDriver, WrapOptions};
use crate::dsn::DsnParser;
use crate::guard::Guard;
use crate::interceptor::context::ExecutionContext;

/// Namespaced identifier a decorator is registered under
pub fn guarded_driver_name(name: &str) -> String {
    format!("dbguard/{}", name)
}

#[derive(Default)]
struct RegistryInner {
    /// Openable by name: namespaced decorators plus raw vendor registrations
    drivers: HashMap<String, Arc<dyn SqlDriver>>,
    /// Plain name → decorator, for the facade and introspection
    guarded: HashMap<String, GuardedDriver>,
}

/// Registry that holds all registered drivers of one protection domain
///
/// Explicitly constructed and owned by the embedder; build one per process
/// (or one per test) and pass it to whatever opens connections.
pub struct DriverRegistry {
    guard: Arc<Guard>,
    inner: RwLock<RegistryInner>,
}

impl DriverRegistry {
    pub fn new(guard: Arc<Guard>) -> Self {
        Self {
            guard,
            inner: RwLock::new(RegistryInner::default()),
        }
    }

    pub fn guard(&self) -> &Arc<Guard> {
        &self.guard
    }

    /// Wraps `driver` and registers the decorator under `name`.
    ///
    /// A second registration under the same name silently replaces the
    /// mapping entry (last write wins); earlier decorators stay usable
    /// through retained references. Returns the decorator.
    pub fn register<D: SqlDriver + 'static>(
        &self,
        name: &str,
        driver: D,
        options: WrapOptions,
    ) -> GuardedDriver {
        let wrapped = GuardedDriver::wrap(driver, Arc::clone(&self.guard), options);

        let mut inner = self.inner.write().unwrap();
        inner.drivers.insert(
            guarded_driver_name(name),
            Arc::new(wrapped.clone()) as Arc<dyn SqlDriver>,
        );
        inner.guarded.insert(name.to_string(), wrapped.clone());

        debug!(name, driver = wrapped.driver_name(), "driver registered");
        wrapped
    }

    /// Registers an un-wrapped driver under its plain name (vendors that
    /// self-register with their own name).
    pub fn register_raw(&self, name: &str, driver: Arc<dyn SqlDriver>) {
        self.inner
            .write()
            .unwrap()
            .drivers
            .insert(name.to_string(), driver);
    }

    /// Looks up an openable driver: a plain vendor name or a namespaced
    /// decorator name.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn SqlDriver>> {
        self.inner.read().unwrap().drivers.get(name).cloned()
    }

    /// Looks up the decorator registered under a plain name.
    pub fn guarded(&self, name: &str) -> Option<GuardedDriver> {
        self.inner.read().unwrap().guarded.get(name).cloned()
    }

    /// The DSN parser associated with a registered name.
    pub fn dsn_parser(&self, name: &str) -> Option<DsnParser> {
        self.guarded(name).map(|driver| driver.dsn_parser())
    }

    /// Registered plain names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().unwrap().guarded.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered decorators
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().guarded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().guarded.is_empty()
    }

    /// Connection-opener facade.
    ///
    /// With the guard armed and an active context, runs the full checkpoint
    /// through the registered decorator. Otherwise degrades to a pure
    /// passthrough with zero interception overhead; the armed state is
    /// checked once per call.
    pub fn open(
        &self,
        cx: &ExecutionContext,
        driver_name: &str,
        dsn: &str,
    ) -> DriverResult<Box<dyn Connection>> {
        if self.guard.is_armed() && cx.is_active() {
            let Some(guarded) = self.guarded(driver_name) else {
                return Err(DriverError::driver_not_found(driver_name));
            };
            return guarded
                .open_in(cx, dsn)
                .map(|conn| Box::new(conn) as Box<dyn Connection>);
        }

        if let Some(guarded) = self.guarded(driver_name) {
            return guarded.open_raw(dsn);
        }
        match self.lookup(driver_name) {
            Some(driver) => driver.open(dsn),
            None => Err(DriverError::driver_not_found(driver_name)),
        }
    }
}
