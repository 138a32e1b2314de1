//! Service layer for business logic
//!
//! Resolution, access decisions and background gauge maintenance, shared by
//! the HTTP handlers and the runtime bootstrap.

pub mod gauge_refresher;
pub mod resolver;
pub mod template;
pub mod visibility;

pub use gauge_refresher::GaugeRefresher;
pub use resolver::{Resolution, ResolverCore, ResolverSettings};
pub use template::{TemplateError, UrlTemplate};
pub use visibility::{AccessDecision, AccessPolicy, Evaluation};
