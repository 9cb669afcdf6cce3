//! Shared utilities for the terminal front-end

pub mod logging;

pub use logging::init_logger;
