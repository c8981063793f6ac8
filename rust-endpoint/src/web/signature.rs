//! Webhook signature verification.
//!
//! The platform signs every request body with HMAC-SHA256 under the app
//! secret and sends the digest in the `x-hub-signature-256` header as
//! `sha256=<hex>`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the request body signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

const SIGNATURE_PREFIX: &str = "sha256=";

/// Verify a webhook body signature.
///
/// The digest must be computed over the exact raw body bytes; a digest of a
/// re-serialized body spuriously fails on whitespace or key-order
/// differences. The comparison runs in constant time for equal-length
/// digests, independent of where the first mismatching byte sits.
///
/// Fails closed: a missing or malformed header is rejected.
pub fn verify_hub_signature(app_secret: &str, raw_body: &[u8], signature_header: &str) -> bool {
    let Some(hex_digest) = signature_header.strip_prefix(SIGNATURE_PREFIX) else {
        warn!(
            has_header = !signature_header.is_empty(),
            "hub_signature_missing_prefix"
        );
        return false;
    };

    let provided = match hex::decode(hex_digest) {
        Ok(bytes) => bytes,
        Err(_) => {
            warn!("hub_signature_invalid_hex");
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(app_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("hub_signature_invalid_key");
            return false;
        }
    };
    mac.update(raw_body);

    // verify_slice rejects wrong-length digests up front and compares the
    // rest in constant time.
    let valid = mac.verify_slice(&provided).is_ok();

    if !valid {
        warn!(digest_length = provided.len(), "hub_signature_mismatch");
    }

    valid
}

/// Check whether signature verification is enabled.
///
/// An unset or blank app secret is an explicit development-mode bypass;
/// callers must log the skipped verification loudly rather than fall
/// through silently.
pub fn is_signature_verification_enabled(app_secret: &Option<String>) -> bool {
    app_secret
        .as_ref()
        .map(|k| !k.trim().is_empty())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn test_verify_valid_signature() {
        let body = br#"{"encrypted_flow_data":"...","encrypted_aes_key":"..."}"#;
        let header = sign("app-secret", body);
        assert!(verify_hub_signature("app-secret", body, &header));
    }

    #[test]
    fn test_verify_tampered_body() {
        let header = sign("app-secret", b"original body");
        assert!(!verify_hub_signature("app-secret", b"tampered body", &header));
    }

    #[test]
    fn test_verify_wrong_secret() {
        let body = b"payload";
        let header = sign("app-secret", body);
        assert!(!verify_hub_signature("other-secret", body, &header));
    }

    #[test]
    fn test_verify_missing_prefix() {
        let body = b"payload";
        let header = sign("app-secret", body);
        let bare = header.strip_prefix("sha256=").unwrap();
        assert!(!verify_hub_signature("app-secret", body, bare));
        assert!(!verify_hub_signature("app-secret", body, ""));
    }

    #[test]
    fn test_verify_invalid_hex() {
        assert!(!verify_hub_signature(
            "app-secret",
            b"payload",
            "sha256=zznothexzz"
        ));
    }

    #[test]
    fn test_verify_truncated_digest() {
        let body = b"payload";
        let header = sign("app-secret", body);
        assert!(!verify_hub_signature(
            "app-secret",
            body,
            &header[..header.len() - 2]
        ));
    }

    #[test]
    fn test_signature_covers_exact_bytes() {
        // Same JSON value, different raw bytes: only the signed bytes pass.
        let compact = br#"{"a":1,"b":2}"#;
        let spaced = br#"{ "a": 1, "b": 2 }"#;
        let header = sign("app-secret", compact);
        assert!(verify_hub_signature("app-secret", compact, &header));
        assert!(!verify_hub_signature("app-secret", spaced, &header));
    }

    #[test]
    fn test_is_signature_verification_enabled() {
        assert!(!is_signature_verification_enabled(&None));
        assert!(!is_signature_verification_enabled(&Some("".to_string())));
        assert!(!is_signature_verification_enabled(&Some("   ".to_string())));
        assert!(is_signature_verification_enabled(&Some(
            "secret123".to_string()
        )));
    }
}
