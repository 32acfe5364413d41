//! # Logpipe
//!
//! An in-process, leveled, multi-backend logging pipeline.
//!
//! ## Features
//!
//! - **Leveled Facade**: eight RFC 5424 severities with threshold filtering
//! - **Pluggable Adapters**: backends self-register by name in a registry
//! - **Rotating File Sink**: size- and day-based rotation, never overwrites
//! - **Async Dispatch**: bounded queue with backpressure and pooled messages
//! - **Thread Safe**: designed for many concurrent producers

pub mod adapters;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::adapters::FileAdapter;
    pub use crate::core::{
        Adapter, AdapterConstructor, Level, LogError, LogMessage, Logger, MessagePool,
        NamedAdapter, Registry, Result,
    };
}

pub use adapters::FileAdapter;
pub use self::core::{
    Adapter, AdapterConstructor, Level, LogError, LogMessage, Logger, MessagePool, NamedAdapter,
    Registry, Result,
};
