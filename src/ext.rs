//! Public extension contracts for delivering acquired tokens.
//!
//! [`SignableRequest`] lets [`crate::login::TokenClient::sign`] attach the access token to
//! whatever request type a caller already uses.

pub mod request_signer;

pub use request_signer::*;
