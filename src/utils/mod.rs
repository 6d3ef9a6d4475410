//! Common utilities and helpers

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
