//! Logger facade and async dispatch pipeline

use super::{
    adapter::NamedAdapter,
    error::{LogError, Result},
    level::Level,
    message::{LogMessage, MessagePool},
    registry::Registry,
};
use crossbeam_channel::{bounded, Sender};
use parking_lot::{Mutex, RwLock};
use std::fmt::Write as _;
use std::panic::Location;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;

/// Dispatch state. `Sync` until [`Logger::async_mode`], then `Running` until
/// [`Logger::close`] replaces it with `Closed`. The transition is one-way.
enum Pipeline {
    Sync,
    Running {
        sender: Sender<LogMessage>,
        pool: Arc<MessagePool>,
    },
    Closed,
}

/// Leveled, multi-backend logging facade.
///
/// Accepts severity-tagged messages from arbitrarily many concurrent
/// producers, filters them by threshold, and dispatches them to every
/// installed adapter in registration order. Dispatch is synchronous on the
/// caller's thread until [`async_mode`](Logger::async_mode) routes it through
/// a bounded queue drained by a single consumer thread.
///
/// # Example
///
/// ```no_run
/// use logpipe::prelude::*;
///
/// let logger = Logger::new(1000);
/// logger.set_logger("file", r#"{"filename":"app.log"}"#).unwrap();
/// logger.async_mode();
/// logger.informational("service started");
/// logger.close();
/// ```
pub struct Logger {
    threshold: AtomicU8,
    mark_caller: AtomicBool,
    queue_capacity: usize,
    pipeline: RwLock<Pipeline>,
    consumer: Mutex<Option<thread::JoinHandle<()>>>,
    outputs: Arc<RwLock<Vec<NamedAdapter>>>,
    registry: Arc<Registry>,
}

impl Logger {
    /// Create a logger backed by the shared adapter registry.
    ///
    /// `queue_capacity` is the fixed size of the async dispatch queue, used
    /// once [`async_mode`](Logger::async_mode) is invoked. The threshold
    /// defaults to [`Level::Debug`] (most permissive); caller marking is off.
    #[must_use]
    pub fn new(queue_capacity: usize) -> Self {
        Self::with_registry(queue_capacity, Registry::shared())
    }

    /// Create a logger backed by an explicitly constructed registry.
    #[must_use]
    pub fn with_registry(queue_capacity: usize, registry: Arc<Registry>) -> Self {
        Self {
            threshold: AtomicU8::new(Level::Debug.as_u8()),
            mark_caller: AtomicBool::new(false),
            queue_capacity,
            pipeline: RwLock::new(Pipeline::Sync),
            consumer: Mutex::new(None),
            outputs: Arc::new(RwLock::new(Vec::new())),
            registry,
        }
    }

    /// Instantiate the adapter registered under `name`, initialize it from
    /// the JSON `config` blob and append it to the output set.
    ///
    /// On an init failure the error is returned and the adapter is not
    /// installed. In-flight log calls proceed against the prior adapter set
    /// while the installation completes.
    pub fn set_logger(&self, name: &str, config: &str) -> Result<()> {
        if matches!(*self.pipeline.read(), Pipeline::Closed) {
            return Err(LogError::Closed);
        }
        let constructor = self
            .registry
            .lookup(name)
            .ok_or_else(|| LogError::unknown_adapter(name))?;
        let mut adapter = constructor();
        adapter.init(config)?;
        self.outputs.write().push(NamedAdapter::new(name, adapter));
        Ok(())
    }

    /// Remove and destroy every installed adapter matching `name`.
    pub fn del_logger(&self, name: &str) -> Result<()> {
        if matches!(*self.pipeline.read(), Pipeline::Closed) {
            return Err(LogError::Closed);
        }
        let mut outputs = self.outputs.write();
        let before = outputs.len();
        outputs.retain(|out| {
            if out.name == name {
                out.adapter.destroy();
                false
            } else {
                true
            }
        });
        if outputs.len() == before {
            return Err(LogError::unknown_adapter(name));
        }
        Ok(())
    }

    /// Update the severity threshold. A message at level L reaches adapters
    /// iff L is at least as severe as the threshold. Messages already sitting
    /// in the async queue are not retroactively filtered.
    pub fn set_level(&self, level: Level) {
        self.threshold.store(level.as_u8(), Ordering::Relaxed);
    }

    /// Current severity threshold.
    pub fn level(&self) -> Level {
        Level::from_u8(self.threshold.load(Ordering::Relaxed)).unwrap_or(Level::Debug)
    }

    /// Whether a message at `level` would pass the threshold filter.
    #[inline]
    pub fn level_enabled(&self, level: Level) -> bool {
        level.as_u8() <= self.threshold.load(Ordering::Relaxed)
    }

    /// Enable or disable the `[file:line]` caller annotation on rendered
    /// lines. Off by default; capture uses `#[track_caller]`, so a wrapper
    /// that should be skipped annotates its own function with
    /// `#[track_caller]`.
    pub fn mark_caller(&self, enabled: bool) {
        self.mark_caller.store(enabled, Ordering::Relaxed);
    }

    /// Switch to asynchronous dispatch: create the bounded queue at the
    /// capacity fixed at construction, materialize the message pool and start
    /// exactly one consumer thread.
    ///
    /// The transition is one-way. Call it before heavy logging begins;
    /// invoking it concurrently with in-flight synchronous writes is the
    /// caller's responsibility.
    ///
    /// # Panics
    ///
    /// Panics if invoked twice or after [`close`](Logger::close).
    pub fn async_mode(&self) -> &Self {
        let mut pipeline = self.pipeline.write();
        match *pipeline {
            Pipeline::Sync => {}
            Pipeline::Running { .. } => panic!("logpipe: async_mode invoked twice"),
            Pipeline::Closed => panic!("logpipe: async_mode invoked after close"),
        }

        let (sender, receiver) = bounded::<LogMessage>(self.queue_capacity);
        let pool = Arc::new(MessagePool::new());
        let outputs = Arc::clone(&self.outputs);
        let consumer_pool = Arc::clone(&pool);

        // The consumer exits once every sender is dropped and the queue is
        // empty, which is exactly the close() drain guarantee.
        let handle = thread::spawn(move || {
            while let Ok(message) = receiver.recv() {
                Self::fan_out(&outputs, &message.text, message.level);
                consumer_pool.release(message);
            }
        });

        *self.consumer.lock() = Some(handle);
        *pipeline = Pipeline::Running { sender, pool };
        self
    }

    /// Log a message at an explicit level.
    #[track_caller]
    pub fn log(&self, level: Level, msg: &str) {
        if !self.level_enabled(level) {
            return;
        }
        self.dispatch(level, msg, Location::caller());
    }

    /// Log an EMERGENCY level message.
    #[track_caller]
    pub fn emergency(&self, msg: &str) {
        self.log(Level::Emergency, msg);
    }

    /// Log an ALERT level message.
    #[track_caller]
    pub fn alert(&self, msg: &str) {
        self.log(Level::Alert, msg);
    }

    /// Log a CRITICAL level message.
    #[track_caller]
    pub fn critical(&self, msg: &str) {
        self.log(Level::Critical, msg);
    }

    /// Log an ERROR level message.
    #[track_caller]
    pub fn error(&self, msg: &str) {
        self.log(Level::Error, msg);
    }

    /// Log a WARNING level message.
    #[track_caller]
    pub fn warning(&self, msg: &str) {
        self.log(Level::Warning, msg);
    }

    /// Log a NOTICE level message.
    #[track_caller]
    pub fn notice(&self, msg: &str) {
        self.log(Level::Notice, msg);
    }

    /// Log an INFORMATIONAL level message.
    #[track_caller]
    pub fn informational(&self, msg: &str) {
        self.log(Level::Informational, msg);
    }

    /// Log a DEBUG level message.
    #[track_caller]
    pub fn debug(&self, msg: &str) {
        self.log(Level::Debug, msg);
    }

    /// Compatibility alias for [`warning`](Logger::warning).
    #[track_caller]
    pub fn warn(&self, msg: &str) {
        self.log(Level::Warning, msg);
    }

    /// Compatibility alias for [`informational`](Logger::informational).
    #[track_caller]
    pub fn info(&self, msg: &str) {
        self.log(Level::Informational, msg);
    }

    /// Compatibility alias for [`debug`](Logger::debug).
    #[track_caller]
    pub fn trace(&self, msg: &str) {
        self.log(Level::Debug, msg);
    }

    /// Force every installed adapter's `flush()`.
    pub fn flush(&self) {
        for out in self.outputs.read().iter() {
            out.adapter.flush();
        }
    }

    /// Terminal shutdown: drain the async queue fully, then flush and destroy
    /// every adapter in registration order.
    ///
    /// Blocks until every message already enqueued has been written.
    /// Producers enqueuing after close begins are undefined and must be
    /// prevented externally; any such message is silently ignored. Idempotent.
    pub fn close(&self) {
        {
            // Replacing Running drops the queue's sender, which disconnects
            // the channel once in-flight producer clones are gone.
            let mut pipeline = self.pipeline.write();
            *pipeline = Pipeline::Closed;
        }
        if let Some(handle) = self.consumer.lock().take() {
            if handle.join().is_err() {
                eprintln!("logpipe: consumer thread panicked during close");
            }
        }
        let mut outputs = self.outputs.write();
        for out in outputs.iter() {
            out.adapter.flush();
            out.adapter.destroy();
        }
        outputs.clear();
    }

    /// Render the line and hand it to the pipeline or the adapters directly.
    fn dispatch(&self, level: Level, msg: &str, location: &'static Location<'static>) {
        let caller = self.mark_caller.load(Ordering::Relaxed).then_some(location);

        let pipeline = self.pipeline.read();
        match &*pipeline {
            Pipeline::Running { sender, pool } => {
                let sender = sender.clone();
                let pool = Arc::clone(pool);
                // Release the state lock before a potentially blocking send
                // so close() is never stuck behind a full queue.
                drop(pipeline);
                let mut message = pool.acquire();
                message.level = level;
                render_line(&mut message.text, level, msg, caller);
                // send blocks while the queue is full: backpressure, never a
                // silent drop. An Err means close() already disconnected the
                // channel; the message is discarded.
                let _ = sender.send(message);
            }
            Pipeline::Sync => {
                drop(pipeline);
                let mut line = String::with_capacity(msg.len() + 8);
                render_line(&mut line, level, msg, caller);
                Self::fan_out(&self.outputs, &line, level);
            }
            Pipeline::Closed => {}
        }
    }

    /// Deliver one rendered line to every adapter in registration order.
    /// A failing adapter is reported, never raised; the remaining adapters
    /// still receive the message.
    fn fan_out(outputs: &RwLock<Vec<NamedAdapter>>, text: &str, level: Level) {
        for out in outputs.read().iter() {
            if let Err(e) = out.adapter.write_msg(text, level) {
                eprintln!("logpipe: unable to write to adapter {:?}: {}", out.name, e);
            }
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Render `[<mark>] <msg>`, optionally prefixed `[file:line]`.
fn render_line(buf: &mut String, level: Level, msg: &str, caller: Option<&Location<'_>>) {
    if let Some(location) = caller {
        let file = Path::new(location.file())
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("???");
        let _ = write!(buf, "[{}:{}]", file, location.line());
    }
    let _ = write!(buf, "[{}] {}", level.mark(), msg);
}
