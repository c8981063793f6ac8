//! FlowGate - encrypted Flow data-exchange endpoint.
//!
//! This library implements the confidential data-exchange protocol between
//! a messaging platform and a flow endpoint: webhook authenticity, AES key
//! unwrapping, authenticated payload decryption, and authenticated reply
//! encryption under a complemented IV.
//!
//! ## Architecture
//!
//! ```text
//! request → Signature Verifier → Envelope Decryptor → Flow Logic → Response Encryptor → response
//! ```

pub mod config;
pub mod crypto;
pub mod flow;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use crypto::{
    decrypt_request, encrypt_response, load_private_key, response_iv, DecryptedRequest, FlowError,
    InboundEnvelope,
};
pub use flow::{next_screen, FlowAction, FlowRequest};
pub use web::AppState;
