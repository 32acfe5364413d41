//! Pooled log message used by the async dispatch pipeline

use super::level::Level;
use parking_lot::Mutex;

/// One queued log message. Ephemeral: in async mode instances cycle through
/// the [`MessagePool`] so the text buffer's capacity is reused.
#[derive(Debug)]
pub struct LogMessage {
    pub level: Level,
    pub text: String,
}

impl LogMessage {
    pub fn new() -> Self {
        Self {
            level: Level::Debug,
            text: String::new(),
        }
    }
}

impl Default for LogMessage {
    fn default() -> Self {
        Self::new()
    }
}

/// Free list of recycled [`LogMessage`]s. Materialized only when the logger
/// switches to async dispatch; synchronous users pay no pooling cost.
pub struct MessagePool {
    free: Mutex<Vec<LogMessage>>,
}

impl MessagePool {
    pub fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
        }
    }

    /// Pop a recycled message, or allocate a fresh one when the pool is empty.
    pub fn acquire(&self) -> LogMessage {
        self.free.lock().pop().unwrap_or_default()
    }

    /// Return a message to the pool. The text is cleared but its buffer
    /// capacity is kept.
    pub fn release(&self, mut message: LogMessage) {
        message.text.clear();
        self.free.lock().push(message);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.free.lock().len()
    }
}

impl Default for MessagePool {
    fn default() -> Self {
        Self::new()
    }
}
