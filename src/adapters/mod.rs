//! Built-in adapter implementations

pub mod file;

pub use file::FileAdapter;

use crate::core::registry::Registry;

/// Register every built-in adapter in `registry`. Called once for the shared
/// registry; explicit registries opt in by calling it themselves.
pub fn register_builtins(registry: &Registry) {
    registry.register_fn("file", || Box::new(FileAdapter::new()));
}
