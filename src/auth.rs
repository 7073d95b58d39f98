//! Bearer token models and the expiry-aware token cache.

pub mod secret;
pub mod token;

pub use secret::*;
pub use token::*;
