//! Private key loading.
//!
//! The service's RSA private key arrives as a PKCS#8 PEM document, either
//! inline in the environment or from a key file, optionally encrypted with
//! a passphrase. It is parsed once at startup and shared read-only across
//! all requests.

use anyhow::{Context, Result};
use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;

/// Parse a PKCS#8 PEM private key.
///
/// An empty passphrase selects the unencrypted PKCS#8 format; otherwise the
/// document is decrypted with the passphrase first.
pub fn load_private_key(pem: &str, passphrase: &str) -> Result<RsaPrivateKey> {
    if passphrase.is_empty() {
        RsaPrivateKey::from_pkcs8_pem(pem).context("Failed to parse PKCS#8 private key")
    } else {
        RsaPrivateKey::from_pkcs8_encrypted_pem(pem, passphrase)
            .context("Failed to decrypt PKCS#8 private key with the configured passphrase")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs8::{EncodePrivateKey, LineEnding};
    use std::sync::OnceLock;

    fn generate_key() -> &'static RsaPrivateKey {
        static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
        KEY.get_or_init(|| {
            RsaPrivateKey::new(&mut rand::thread_rng(), 2048).expect("generate test key")
        })
    }

    #[test]
    fn test_load_unencrypted_key() {
        let key = generate_key();
        let pem = key.to_pkcs8_pem(LineEnding::LF).unwrap();

        let loaded = load_private_key(&pem, "").unwrap();
        assert_eq!(&loaded, key);
    }

    #[test]
    fn test_load_encrypted_key() {
        let key = generate_key();
        let pem = key
            .to_pkcs8_encrypted_pem(&mut rand::thread_rng(), "hunter2", LineEnding::LF)
            .unwrap();

        let loaded = load_private_key(&pem, "hunter2").unwrap();
        assert_eq!(&loaded, key);
    }

    #[test]
    fn test_wrong_passphrase_fails() {
        let key = generate_key();
        let pem = key
            .to_pkcs8_encrypted_pem(&mut rand::thread_rng(), "hunter2", LineEnding::LF)
            .unwrap();

        assert!(load_private_key(&pem, "wrong").is_err());
    }

    #[test]
    fn test_garbage_pem_fails() {
        assert!(load_private_key("not a pem document", "").is_err());
    }
}
