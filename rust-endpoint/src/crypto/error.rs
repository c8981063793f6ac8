//! Protocol error model.
//!
//! A closed set of failure kinds, each mapped to the transport status code
//! the calling platform understands. Error responses always have an empty
//! body; detail stays in local logs.

use thiserror::Error;

/// Failure kinds of the encrypted data-exchange protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FlowError {
    /// An envelope field is missing, not valid base64, or the IV has the
    /// wrong size.
    #[error("envelope is missing fields or carries invalid base64")]
    MalformedEnvelope,

    /// Unwrapping the AES key failed. The client is holding a public key
    /// that no longer matches our private key and must refresh it.
    #[error("could not unwrap the AES key with the configured private key")]
    KeyMismatch,

    /// Authenticated decryption of the flow payload failed (tag mismatch
    /// or corrupted ciphertext).
    #[error("authenticated decryption of the flow payload failed")]
    PayloadDecryptionFailed,

    /// The decrypted bytes are not valid JSON.
    #[error("decrypted payload is not valid JSON")]
    MalformedPayload,

    /// The request body signature did not match the app secret.
    #[error("request signature did not match")]
    SignatureInvalid,

    /// Business logic failed between decryption and encryption.
    #[error("internal error while handling the request")]
    InternalFailure,
}

impl FlowError {
    /// Transport status code for this failure.
    ///
    /// 421 tells the client to refresh its cached public key and retry;
    /// conflating it with a generic decryption failure would break that
    /// recovery contract. 432 marks a rejected signature.
    pub fn status_code(&self) -> u16 {
        match self {
            FlowError::MalformedEnvelope => 400,
            FlowError::KeyMismatch => 421,
            FlowError::PayloadDecryptionFailed => 500,
            FlowError::MalformedPayload => 400,
            FlowError::SignatureInvalid => 432,
            FlowError::InternalFailure => 500,
        }
    }
}
