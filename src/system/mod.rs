//! System-level modules
//!
//! Logging setup shared by every execution mode.

pub mod logging;

pub use logging::init_logging;
