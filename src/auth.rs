//! Credential and bearer-token models.

pub mod credentials;
pub mod secret;

pub use credentials::*;
pub use secret::*;
