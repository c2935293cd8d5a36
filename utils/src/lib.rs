//! Shared utilities for the governance tools.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
