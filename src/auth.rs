//! Auth-domain identifiers, secrets, and credential providers.

pub mod credentials;
pub mod id;
pub mod secret;

pub use credentials::{CredentialError, CredentialFuture, CredentialProvider};
pub use id::*;
pub use secret::*;
