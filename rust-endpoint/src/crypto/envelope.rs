//! Inbound envelope decryption.
//!
//! The platform posts a JSON body with three base64 fields: the AES-GCM
//! encrypted business payload, the per-request AES key wrapped with the
//! service's RSA public key, and the initialization vector. Decryption
//! unwraps the key with RSA-OAEP (SHA-256 for both the digest and the MGF1
//! hash), then authenticated-decrypts the payload with AES-128-GCM.

use std::fmt;

use aes_gcm::aead::consts::U16;
use aes_gcm::{
    aead::{Aead, KeyInit},
    aes::Aes128,
    AesGcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rsa::{Oaep, RsaPrivateKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::error::FlowError;

/// AES-128 key size in bytes.
pub const AES_KEY_LEN: usize = 16;

/// GCM initialization vector size used by the platform.
pub const IV_LEN: usize = 16;

/// GCM authentication tag size, appended to the ciphertext.
pub const TAG_LEN: usize = 16;

/// AES-128-GCM with the platform's 16-byte IV.
pub(crate) type FlowCipher = AesGcm<Aes128, U16>;

/// Encrypted request body as posted by the platform.
///
/// All three fields are standard-base64 text; `encrypted_flow_data` carries
/// the GCM tag appended to the ciphertext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEnvelope {
    pub encrypted_flow_data: String,
    pub encrypted_aes_key: String,
    pub initial_vector: String,
}

/// Decrypted request material, scoped to a single exchange.
///
/// The AES key and IV are reused by the response encryptor to build the
/// reply, then the whole structure is dropped with the key material wiped.
/// Must never be cached, persisted, or logged.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DecryptedRequest {
    pub aes_key: [u8; AES_KEY_LEN],
    pub iv: [u8; IV_LEN],
    #[zeroize(skip)]
    pub payload: Value,
}

// Redacted by hand: key material and decrypted payloads must never reach
// diagnostic output.
impl fmt::Debug for DecryptedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptedRequest")
            .field("aes_key", &"[redacted]")
            .field("iv", &"[redacted]")
            .field("payload", &"[redacted]")
            .finish()
    }
}

/// Decrypt an inbound envelope.
///
/// Fails with the matching [`FlowError`] kind: decode problems are
/// [`FlowError::MalformedEnvelope`], a failed key unwrap is
/// [`FlowError::KeyMismatch`] (the client must refresh its cached public
/// key), a failed payload decrypt is [`FlowError::PayloadDecryptionFailed`],
/// and non-JSON plaintext is [`FlowError::MalformedPayload`].
pub fn decrypt_request(
    envelope: &InboundEnvelope,
    private_key: &RsaPrivateKey,
) -> Result<DecryptedRequest, FlowError> {
    let flow_data = BASE64
        .decode(&envelope.encrypted_flow_data)
        .map_err(|_| FlowError::MalformedEnvelope)?;
    let wrapped_key = BASE64
        .decode(&envelope.encrypted_aes_key)
        .map_err(|_| FlowError::MalformedEnvelope)?;
    let iv_bytes = BASE64
        .decode(&envelope.initial_vector)
        .map_err(|_| FlowError::MalformedEnvelope)?;

    let iv: [u8; IV_LEN] = iv_bytes
        .as_slice()
        .try_into()
        .map_err(|_| FlowError::MalformedEnvelope)?;

    // An unwrap failure means the client encrypted the key with a public
    // key that no longer matches our private key. A key of the wrong size
    // is the same condition: whatever the client is holding is not ours.
    let key_bytes = Zeroizing::new(
        private_key
            .decrypt(Oaep::new::<Sha256>(), &wrapped_key)
            .map_err(|_| FlowError::KeyMismatch)?,
    );
    let aes_key: [u8; AES_KEY_LEN] = key_bytes
        .as_slice()
        .try_into()
        .map_err(|_| FlowError::KeyMismatch)?;

    let cipher = FlowCipher::new(Key::<FlowCipher>::from_slice(&aes_key));
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(&iv), flow_data.as_slice())
            .map_err(|_| FlowError::PayloadDecryptionFailed)?,
    );

    let payload: Value =
        serde_json::from_slice(&plaintext).map_err(|_| FlowError::MalformedPayload)?;

    Ok(DecryptedRequest {
        aes_key,
        iv,
        payload,
    })
}
