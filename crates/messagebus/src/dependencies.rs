//! Typed dependency pool used to construct handlers.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::BusError;

/// A pool of singleton dependencies keyed by type.
///
/// Handlers pull exactly the dependencies they need through [`Inject`];
/// asking for a type that was never inserted is a configuration error.
/// Trait objects are stored behind a sized handle such as
/// `Arc<dyn Publisher>`.
#[derive(Clone, Default)]
pub struct Dependencies {
    entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Dependencies {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dependency, replacing any previous value of the same type.
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    /// Adds a dependency in place.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.entries.insert(TypeId::of::<T>(), Arc::new(value));
    }

    /// Returns true if a value of type `T` is available.
    pub fn contains<T: Any>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Returns a clone of the dependency of type `T`.
    pub fn resolve<T: Any + Send + Sync + Clone>(&self) -> Result<T, BusError> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| (**entry).downcast_ref::<T>())
            .cloned()
            .ok_or(BusError::MissingDependency {
                dependency: type_name::<T>(),
            })
    }

    /// Returns the number of registered dependencies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no dependency is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependencies")
            .field("count", &self.entries.len())
            .finish()
    }
}

/// Constructs a handler from the dependency pool.
///
/// Each handler declares what it needs by resolving it here, so a handler
/// never sees dependencies it did not ask for.
pub trait Inject: Sized {
    fn inject(dependencies: &Dependencies) -> Result<Self, BusError>;
}
