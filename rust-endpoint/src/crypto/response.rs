//! Response encryption.
//!
//! Replies are authenticated-encrypted under the same per-request AES key
//! that the envelope decryptor recovered, with the IV derived by inverting
//! every bit of the request IV. The platform decrypts with exactly that
//! complemented IV, and the derivation keeps the request and response from
//! ever sharing a (key, nonce) pair.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::Value;

use super::envelope::{FlowCipher, AES_KEY_LEN, IV_LEN};
use super::error::FlowError;

/// Derive the response IV: the bitwise complement of the request IV.
pub fn response_iv(request_iv: &[u8; IV_LEN]) -> [u8; IV_LEN] {
    let mut flipped = [0u8; IV_LEN];
    for (out, byte) in flipped.iter_mut().zip(request_iv) {
        *out = !byte;
    }
    flipped
}

/// Encrypt a JSON reply for the platform.
///
/// Returns the base64 of ciphertext with the GCM tag appended, which is the
/// entire HTTP response body. With a key and IV recovered by
/// [`super::decrypt_request`] this cannot fail; any error here is mapped to
/// [`FlowError::InternalFailure`] rather than leaking a partial reply.
pub fn encrypt_response(
    payload: &Value,
    aes_key: &[u8; AES_KEY_LEN],
    request_iv: &[u8; IV_LEN],
) -> Result<String, FlowError> {
    let iv = response_iv(request_iv);
    let plaintext = serde_json::to_vec(payload).map_err(|_| FlowError::InternalFailure)?;

    let cipher = FlowCipher::new(Key::<FlowCipher>::from_slice(aes_key));
    let sealed = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext.as_slice())
        .map_err(|_| FlowError::InternalFailure)?;

    Ok(BASE64.encode(sealed))
}
