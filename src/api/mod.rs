pub mod identity;
pub mod services;

pub use identity::IdentityHeaders;
