//! Core pipeline types and traits

pub mod adapter;
pub mod error;
pub mod level;
pub mod logger;
pub mod message;
pub mod registry;

pub use adapter::{Adapter, NamedAdapter};
pub use error::{LogError, Result};
pub use level::Level;
pub use logger::Logger;
pub use message::{LogMessage, MessagePool};
pub use registry::{AdapterConstructor, Registry};
