//! Mode routing
//!
//! The resolver only runs as an HTTP server; configuration generation is
//! handled directly in `main`.

pub mod server;

pub use server::run_server;
