use std::fmt;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::source::SchemaSourceDescriptor;

use super::ObjectFactoryRegistry;

type InitFn = dyn Fn() -> Result<ObjectFactoryRegistry, RegistryError> + Send + Sync;

/// Lifecycle of a [`LazyRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RegistryState {
    Uninitialized = 0,
    Constructing = 1,
    Ready = 2,
}

impl RegistryState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => RegistryState::Constructing,
            2 => RegistryState::Ready,
            _ => RegistryState::Uninitialized,
        }
    }
}

/// Host-owned holder that builds the registry on first use.
///
/// Concurrent first calls to [`instance`](Self::instance) run the builder
/// once; every caller gets the same registry. A failed build leaves the
/// holder uninitialized and returns the error to the caller that ran it.
pub struct LazyRegistry {
    init: Box<InitFn>,
    cell: OnceLock<Arc<ObjectFactoryRegistry>>,
    build_lock: Mutex<()>,
    state: AtomicU8,
    builds: AtomicUsize,
}

impl LazyRegistry {
    pub fn new(
        init: impl Fn() -> Result<ObjectFactoryRegistry, RegistryError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            init: Box::new(init),
            cell: OnceLock::new(),
            build_lock: Mutex::new(()),
            state: AtomicU8::new(RegistryState::Uninitialized as u8),
            builds: AtomicUsize::new(0),
        }
    }

    /// Holder that builds the registry from a fixed source list.
    pub fn from_sources(sources: Vec<SchemaSourceDescriptor>, config: RegistryConfig) -> Self {
        Self::new(move || ObjectFactoryRegistry::new(sources.clone(), config.clone()))
    }

    /// Returns the registry, building it on the first call.
    pub fn instance(&self) -> Result<Arc<ObjectFactoryRegistry>, RegistryError> {
        if let Some(registry) = self.cell.get() {
            return Ok(Arc::clone(registry));
        }

        let _guard = self.build_lock.lock();
        if let Some(registry) = self.cell.get() {
            return Ok(Arc::clone(registry));
        }

        self.state
            .store(RegistryState::Constructing as u8, Ordering::Release);
        self.builds.fetch_add(1, Ordering::Relaxed);
        match (self.init)() {
            Ok(registry) => {
                let registry = Arc::new(registry);
                let stored = Arc::clone(self.cell.get_or_init(|| registry));
                self.state.store(RegistryState::Ready as u8, Ordering::Release);
                Ok(stored)
            }
            Err(e) => {
                self.state
                    .store(RegistryState::Uninitialized as u8, Ordering::Release);
                tracing::error!("Failed to build the IDD factory: {}", e);
                Err(e)
            }
        }
    }

    /// Returns the registry if it has been built.
    pub fn get(&self) -> Option<Arc<ObjectFactoryRegistry>> {
        self.cell.get().cloned()
    }

    pub fn state(&self) -> RegistryState {
        RegistryState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Number of times the builder has run.
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for LazyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyRegistry")
            .field("state", &self.state())
            .field("builds", &self.build_count())
            .finish_non_exhaustive()
    }
}
