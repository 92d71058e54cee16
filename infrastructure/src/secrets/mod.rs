//! Secret providers
//!
//! Implementations of [`SecretProvider`](harvest_application::SecretProvider):
//! a plain password from configuration, or the Bitwarden CLI.

mod bitwarden;
mod plain;

pub use bitwarden::BitwardenSecrets;
pub use plain::PlainSecrets;
