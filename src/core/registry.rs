//! Named adapter constructors

use super::adapter::Adapter;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Constructor closure held by the registry; each call produces a fresh,
/// uninitialized adapter instance.
pub type AdapterConstructor = Arc<dyn Fn() -> Box<dyn Adapter> + Send + Sync>;

/// Append-only map from adapter name to constructor, so the logger needs no
/// compile-time knowledge of backend types.
///
/// Construct one explicitly with [`Registry::new`], or use the single
/// process-wide default via [`Registry::shared`], which comes with the
/// built-in adapters pre-registered.
pub struct Registry {
    entries: RwLock<HashMap<String, AdapterConstructor>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The default registry instance, lazily initialized with the built-in
    /// adapter set ([`crate::adapters::register_builtins`]).
    pub fn shared() -> Arc<Registry> {
        static SHARED: OnceLock<Arc<Registry>> = OnceLock::new();
        SHARED
            .get_or_init(|| {
                let registry = Registry::new();
                crate::adapters::register_builtins(&registry);
                Arc::new(registry)
            })
            .clone()
    }

    /// Make an adapter constructor available under `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or already registered. Both are programming
    /// errors; the registry must not continue in an inconsistent state.
    pub fn register(&self, name: impl Into<String>, constructor: AdapterConstructor) {
        let name = name.into();
        assert!(!name.is_empty(), "logpipe: register called with empty adapter name");
        let mut entries = self.entries.write();
        assert!(
            !entries.contains_key(&name),
            "logpipe: register called twice for adapter {name}"
        );
        entries.insert(name, constructor);
    }

    /// Convenience wrapper over [`register`](Registry::register) for plain
    /// closures.
    pub fn register_fn<F>(&self, name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Box<dyn Adapter> + Send + Sync + 'static,
    {
        self.register(name, Arc::new(constructor));
    }

    /// Look up the constructor registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<AdapterConstructor> {
        self.entries.read().get(name).cloned()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
