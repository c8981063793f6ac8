//! Cryptographic core of the encrypted Flow data-exchange protocol.
//!
//! This module owns the confidential exchange with the platform:
//! - `envelope`: unwrap the per-request AES key and decrypt the payload
//! - `response`: encrypt the reply under the complemented IV
//! - `keys`: load the long-lived RSA private key at startup
//! - `error`: the closed protocol error model and its status codes
//!
//! Everything here is CPU-bound and stateless per request; the private key
//! is read-only after startup and safe to share across concurrent requests.

pub mod envelope;
pub mod error;
pub mod keys;
pub mod response;

pub use envelope::{
    decrypt_request, DecryptedRequest, InboundEnvelope, AES_KEY_LEN, IV_LEN, TAG_LEN,
};
pub use error::FlowError;
pub use keys::load_private_key;
pub use response::{encrypt_response, response_iv};
