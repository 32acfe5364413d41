//! Adapter capability for log output backends

use super::{error::Result, level::Level};

/// A pluggable backend that persists or emits formatted log lines.
///
/// `write_msg` takes `&self`: in synchronous dispatch adapters are invoked
/// concurrently from every producer thread, so each implementation must be
/// internally thread-safe.
pub trait Adapter: Send + Sync {
    /// Configure the adapter from a JSON key-value blob. Optional keys take
    /// defaults; missing required keys fail fast.
    fn init(&mut self, config: &str) -> Result<()>;

    /// Append one rendered message. The level is the message's severity;
    /// filtering has already happened at the facade.
    fn write_msg(&self, text: &str, level: Level) -> Result<()>;

    /// Force buffered data to stable storage.
    fn flush(&self);

    /// Release the adapter's resources. Idempotent.
    fn destroy(&self);
}

/// An installed adapter together with the name it was registered under.
/// Owned exclusively by the logger; installation order is write order.
pub struct NamedAdapter {
    pub name: String,
    pub adapter: Box<dyn Adapter>,
}

impl NamedAdapter {
    pub fn new(name: impl Into<String>, adapter: Box<dyn Adapter>) -> Self {
        Self {
            name: name.into(),
            adapter,
        }
    }
}
