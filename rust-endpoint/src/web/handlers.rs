//! Webhook endpoint handlers.
//!
//! The flow endpoint runs the full exchange in order:
//! 1. Verify the body signature against the exact raw bytes
//! 2. Parse and decrypt the envelope
//! 3. Run the flow business logic
//! 4. Encrypt the reply under the complemented IV
//!
//! Every failure maps to a bare status code with an empty body; error
//! detail stays in local logs and never reaches the wire.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::crypto::{decrypt_request, encrypt_response, FlowError, InboundEnvelope};
use crate::flow::{self, FlowRequest};
use crate::web::signature::{
    is_signature_verification_enabled, verify_hub_signature, SIGNATURE_HEADER,
};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub private_key: Arc<RsaPrivateKey>,
}

impl AppState {
    pub fn new(config: Config, private_key: RsaPrivateKey) -> Self {
        Self {
            config: Arc::new(config),
            private_key: Arc::new(private_key),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Plain-text liveness page.
pub async fn index() -> &'static str {
    "Flow endpoint is running. POST / to exchange flow requests.\n"
}

// =============================================================================
// Subscription Verification
// =============================================================================

/// Query parameters of the platform's subscription handshake.
#[derive(Debug, Deserialize)]
pub struct SubscriptionQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Webhook subscription verification endpoint.
///
/// Echoes `hub.challenge` when the mode is `subscribe` and the supplied
/// token matches the configured verify token; rejects everything else.
pub async fn verify_subscription(
    State(state): State<AppState>,
    Query(query): Query<SubscriptionQuery>,
) -> impl IntoResponse {
    let SubscriptionQuery {
        mode,
        verify_token,
        challenge,
    } = query;
    let expected = state.config.verify_token.as_deref();

    match (mode.as_deref(), verify_token.as_deref(), expected) {
        (Some("subscribe"), Some(token), Some(configured)) if token == configured => {
            info!("webhook_subscription_verified");
            (StatusCode::OK, challenge.unwrap_or_default())
        }
        _ => {
            warn!(
                mode = ?mode,
                token_configured = expected.is_some(),
                "webhook_subscription_rejected"
            );
            (StatusCode::FORBIDDEN, String::new())
        }
    }
}

// =============================================================================
// Flow Endpoint
// =============================================================================

/// Map a protocol error to its transport status.
fn error_status(err: &FlowError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Encrypted flow data-exchange endpoint.
///
/// The body is taken as raw bytes so signature verification covers exactly
/// what the platform signed.
pub async fn flow_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    info!(body_length = body.len(), "flow_request_received");

    // Signature check runs over the raw bytes, before any parsing.
    if is_signature_verification_enabled(&state.config.app_secret) {
        let app_secret = state.config.app_secret.as_deref().unwrap_or_default();
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !verify_hub_signature(app_secret, &body, signature) {
            warn!(
                has_signature_header = !signature.is_empty(),
                "flow_signature_invalid"
            );
            return (error_status(&FlowError::SignatureInvalid), String::new());
        }
    } else {
        warn!("app_secret_not_configured_skipping_signature_verification");
    }

    let envelope: InboundEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(error = %err, "flow_envelope_malformed");
            return (error_status(&FlowError::MalformedEnvelope), String::new());
        }
    };

    let decrypted = match decrypt_request(&envelope, &state.private_key) {
        Ok(decrypted) => decrypted,
        Err(err) => {
            error!(kind = %err, status = err.status_code(), "flow_decryption_failed");
            return (error_status(&err), String::new());
        }
    };

    let request = FlowRequest::from_payload(&decrypted.payload);
    info!(action = ?request.action, screen = ?request.screen, "flow_request_decrypted");

    let reply = match flow::next_screen(&request) {
        Ok(reply) => reply,
        Err(err) => {
            error!(error = %err, "flow_business_logic_failed");
            return (error_status(&FlowError::InternalFailure), String::new());
        }
    };

    match encrypt_response(&reply, &decrypted.aes_key, &decrypted.iv) {
        Ok(response_body) => {
            info!(action = ?request.action, "flow_response_encrypted");
            (StatusCode::OK, response_body)
        }
        Err(err) => {
            error!(kind = %err, "flow_response_encryption_failed");
            (error_status(&err), String::new())
        }
    }
}
