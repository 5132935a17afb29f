//! Bridge channel wire protocol.
//!
//! The system bridge is a single named channel carrying JSON frames:
//! - `MethodCall`: caller to handler, one per invocation
//! - `ResponseFrame`: handler to caller, wrapping a [`MethodOutcome`]
//! - `EventFrame`: server-to-caller push (message-created fanout)
//!
//! A method invocation resolves to exactly one of three outcomes: success,
//! a structured error, or not-implemented. The third variant is deliberate:
//! it tells the caller no handler exists for that method name, so it can
//! fall back instead of treating the condition as a failure.

use serde::{Deserialize, Serialize};

// ── Constants ────────────────────────────────────────────────────────────────

/// Name of the system bridge channel. Caller and host must agree on it.
pub const SYSTEM_CHANNEL: &str = "orion.system";

/// Maximum accepted size of a single inbound frame.
pub const MAX_PAYLOAD_BYTES: usize = 65_536; // 64 KB

// ── Error codes ──────────────────────────────────────────────────────────────

pub mod error_codes {
    /// Lookup of the installed artifact path failed.
    pub const APK_PATH_ERROR: &str = "APK_PATH_ERROR";
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
}

// ── Error shape ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorShape {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorShape {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }
}

// ── Method call ──────────────────────────────────────────────────────────────

/// Caller → handler invocation. Transient: consumed by one dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodCall {
    pub id: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl MethodCall {
    pub fn new(id: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method: method.into(),
            params: None,
        }
    }
}

// ── Method outcome ───────────────────────────────────────────────────────────

/// Result of dispatching one [`MethodCall`].
///
/// `NotImplemented` is distinct from `Error`: it carries no code or message
/// and signals a missing handler, not a failed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodOutcome {
    Success { value: serde_json::Value },
    Error { error: ErrorShape },
    NotImplemented,
}

impl MethodOutcome {
    pub fn success(value: serde_json::Value) -> Self {
        Self::Success { value }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            error: ErrorShape::new(code, message),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

// ── Frames ───────────────────────────────────────────────────────────────────

/// Handler → caller response, correlated by call id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseFrame {
    pub r#type: String, // always "res"
    pub id: String,
    pub outcome: MethodOutcome,
}

impl ResponseFrame {
    pub fn new(id: impl Into<String>, outcome: MethodOutcome) -> Self {
        Self {
            r#type: "res".into(),
            id: id.into(),
            outcome,
        }
    }
}

/// Server → caller push event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventFrame {
    pub r#type: String, // always "event"
    pub event: String,
    pub payload: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
}

impl EventFrame {
    pub fn new(event: impl Into<String>, payload: serde_json::Value, seq: u64) -> Self {
        Self {
            r#type: "event".into(),
            event: event.into(),
            payload,
            seq: Some(seq),
        }
    }
}
