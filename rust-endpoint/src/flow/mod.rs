//! Flow business logic.
//!
//! Routes a decrypted request to the screen JSON the platform renders next.
//! This runs strictly between envelope decryption and response encryption;
//! any failure here surfaces to the caller, which answers with a bare
//! server error instead of a partial encrypted reply.

pub mod request;

use anyhow::{bail, Result};
use serde_json::{json, Value};
use tracing::{info, warn};

pub use request::{FlowAction, FlowRequest};

/// Compute the reply for a decrypted flow request.
pub fn next_screen(request: &FlowRequest) -> Result<Value> {
    // Client error notifications are acknowledged regardless of action.
    if request.is_error_notification() {
        warn!(screen = ?request.screen, "flow_error_notification_received");
        return Ok(json!({ "data": { "acknowledged": true } }));
    }

    match request.action {
        FlowAction::Ping => Ok(json!({ "data": { "status": "active" } })),
        FlowAction::Init => Ok(json!({ "screen": "SCREEN_ONE", "data": {} })),
        FlowAction::DataExchange => {
            info!(screen = ?request.screen, "flow_data_exchange");
            let screen = request
                .screen
                .clone()
                .unwrap_or_else(|| "SCREEN_ONE".to_string());
            Ok(json!({ "screen": screen, "data": { "updated": true } }))
        }
        FlowAction::Navigate => Ok(json!({ "screen": "SCREEN_TWO", "data": {} })),
        FlowAction::Complete => Ok(json!({ "action": "complete", "data": { "success": true } })),
        FlowAction::Unknown => bail!("unhandled flow action"),
    }
}
