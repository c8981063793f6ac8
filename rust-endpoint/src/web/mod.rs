//! Web server module for the encrypted flow endpoint.
//!
//! This module provides the HTTP surface of the service:
//! - Receives encrypted flow webhooks from the platform
//! - Verifies the HMAC body signature
//! - Runs the decrypt → business logic → encrypt exchange
//! - Answers subscription verification and health probes

pub mod handlers;
pub mod signature;

pub use handlers::{
    flow_webhook, health, index, verify_subscription, AppState, HealthResponse, SubscriptionQuery,
};
pub use signature::{is_signature_verification_enabled, verify_hub_signature, SIGNATURE_HEADER};
