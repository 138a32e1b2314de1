//! golink - a go-link resolver
//!
//! Resolves short, memorable path slugs to destination URLs, enforces
//! per-link visibility rules and records clicks without slowing down the
//! redirect.
//!
//! # Features
//! - **metrics**: Prometheus metrics export (default)
//!
//! # Architecture
//! - `services`: resolver core, URL templates, access decisions
//! - `analytics`: click events and the bounded recording pipeline
//! - `storage`: SeaORM-backed store (SQLite / MySQL / PostgreSQL)
//! - `api`: HTTP handlers and identity extraction
//! - `config`: configuration loading
//! - `runtime`: application lifecycle and server mode
//! - `system`: logging

#[macro_use]
mod metrics_macros;

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod metrics_core;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
