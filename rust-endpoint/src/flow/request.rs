//! Typed decoding of decrypted flow payloads.

use serde::Deserialize;
use serde_json::Value;

/// Action discriminator sent by the platform in every flow payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowAction {
    /// First request when the user opens the flow.
    #[serde(alias = "INIT")]
    Init,
    /// Health probe; must be answered with an active status.
    Ping,
    /// A screen submitted data back to the endpoint.
    DataExchange,
    /// Forward navigation between screens.
    Navigate,
    /// Terminal request when the user finishes the flow.
    Complete,
    /// Any action this endpoint does not recognize.
    #[default]
    #[serde(other)]
    Unknown,
}

/// A decrypted flow request.
///
/// Decoded leniently: payloads that do not match this shape fall back to
/// [`FlowAction::Unknown`] instead of failing the exchange mid-flight.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlowRequest {
    /// Flow data API version.
    #[serde(default)]
    pub version: Option<String>,
    /// What the client is asking for.
    #[serde(default)]
    pub action: FlowAction,
    /// Screen the request originated from.
    #[serde(default)]
    pub screen: Option<String>,
    /// Screen-supplied data.
    #[serde(default)]
    pub data: Option<Value>,
    /// Opaque token identifying this flow session.
    #[serde(default)]
    pub flow_token: Option<String>,
}

impl FlowRequest {
    /// Decode a decrypted payload with a defined fallback: anything that
    /// does not fit the expected shape becomes an unknown-action request.
    pub fn from_payload(payload: &Value) -> Self {
        serde_json::from_value(payload.clone()).unwrap_or_default()
    }

    /// Whether the payload carries a client-side error notification.
    pub fn is_error_notification(&self) -> bool {
        self.data
            .as_ref()
            .map(|data| data.get("error").is_some() || data.get("error_message").is_some())
            .unwrap_or(false)
    }
}
