use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use crate::definition::SchemaObjectDefinition;

/// Type alias for an object constructor callback.
pub type CreateObjectFn = dyn Fn() -> SchemaObjectDefinition + Send + Sync;

/// Constructor callback with its construct-once cache.
pub(crate) struct ObjectCallback {
    create: Box<CreateObjectFn>,
    cell: OnceLock<Arc<SchemaObjectDefinition>>,
    constructions: AtomicUsize,
}

impl ObjectCallback {
    pub(crate) fn new(
        create: impl Fn() -> SchemaObjectDefinition + Send + Sync + 'static,
    ) -> Self {
        Self {
            create: Box::new(create),
            cell: OnceLock::new(),
            constructions: AtomicUsize::new(0),
        }
    }

    /// Returns the cached definition, constructing it on the first call.
    ///
    /// Concurrent first calls block on the cell until the single construction
    /// finishes.
    pub(crate) fn invoke(&self) -> Arc<SchemaObjectDefinition> {
        let definition = self.cell.get_or_init(|| {
            self.constructions.fetch_add(1, Ordering::Relaxed);
            Arc::new((self.create)())
        });
        Arc::clone(definition)
    }

    pub(crate) fn construction_count(&self) -> usize {
        self.constructions.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for ObjectCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectCallback")
            .field("constructed", &self.cell.get().is_some())
            .finish_non_exhaustive()
    }
}
