//! Request/response descriptors and the hook-chain capability.
//!
//! A hook chain is whatever the HTTP client exposes for running code right
//! before a request is sent and right after a response arrives. The converter
//! only needs to append hooks to it, so the capability is kept to three
//! methods. [`crate::Client`] ships an in-memory implementation.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

use crate::transformer::Direction;

/// Outgoing request as seen by outbound hooks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    /// HTTP method
    pub method: String,
    /// Request URL or path
    pub url: String,
    /// Request headers
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Query parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<JsonValue>,
    /// Request payload. A string payload is already serialized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<JsonValue>,
}

impl RequestConfig {
    /// Create a request with no params and no body.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new("POST", url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new("DELETE", url)
    }

    /// Set query parameters.
    pub fn with_params(mut self, params: JsonValue) -> Self {
        self.params = Some(params);
        self
    }

    /// Set the request payload.
    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Render params as a form-urlencoded query string (without leading `?`).
    ///
    /// Arrays repeat the key, objects are JSON-encoded and `null` entries are
    /// skipped. Returns `None` when there is nothing to render.
    pub fn query_string(&self) -> Option<String> {
        let JsonValue::Object(params) = self.params.as_ref()? else {
            return None;
        };

        let mut parts = Vec::new();
        for (key, value) in params {
            match value {
                JsonValue::Null => {}
                JsonValue::Array(items) => {
                    for item in items.iter().filter(|v| !v.is_null()) {
                        parts.push(encode_pair(key, item));
                    }
                }
                other => parts.push(encode_pair(key, other)),
            }
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("&"))
        }
    }

    /// Render the body the way it goes on the wire: strings verbatim,
    /// anything else JSON-encoded.
    pub fn serialized_body(&self) -> Option<String> {
        match self.body.as_ref()? {
            JsonValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

fn encode_pair(key: &str, value: &JsonValue) -> String {
    let value = match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    };
    format!("{}={}", urlencoding::encode(key), urlencoding::encode(&value))
}

/// Incoming response as seen by inbound hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Status text
    #[serde(default)]
    pub status_text: String,
    /// Response headers
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Decoded response payload
    #[serde(default)]
    pub body: JsonValue,
}

impl Response {
    /// Create a response with an empty-string body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            status_text: String::new(),
            headers: HashMap::new(),
            body: JsonValue::String(String::new()),
        }
    }

    /// Set the response payload.
    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = body;
        self
    }

    /// Set the status text.
    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = text.into();
        self
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// True when the body carries nothing worth converting:
    /// `null`, `false`, `0`, or an empty string.
    pub fn has_empty_body(&self) -> bool {
        is_falsy(&self.body)
    }
}

/// Falsy JSON values.
pub fn is_falsy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => false,
    }
}

/// Errors flowing through hook chains.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HookError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Other(String),
}

/// Fulfilled handler: receives the value produced so far.
pub type OnFulfilled<T> = Arc<dyn Fn(T) -> Result<T, HookError> + Send + Sync>;

/// Rejected handler: receives the error produced so far and may recover.
pub type OnRejected<T> = Arc<dyn Fn(HookError) -> Result<T, HookError> + Send + Sync>;

/// Opaque handle for a registered hook.
///
/// A handle is only meaningful to the chain that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookHandle {
    direction: Direction,
    id: usize,
}

impl HookHandle {
    pub fn new(direction: Direction, id: usize) -> Self {
        Self { direction, id }
    }

    /// Which chain this handle belongs to.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Slot id within that chain.
    pub fn id(&self) -> usize {
        self.id
    }
}

/// Handles returned by installation, one per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookHandles {
    /// Handle of the request hook
    pub outbound: HookHandle,
    /// Handle of the response hook
    pub inbound: HookHandle,
}

/// Minimal capability an HTTP client must offer to host the converter.
pub trait HookChain {
    /// Append a hook to the pre-send chain.
    fn register_outbound(
        &mut self,
        on_request: OnFulfilled<RequestConfig>,
        on_error: OnRejected<RequestConfig>,
    ) -> HookHandle;

    /// Append a hook to the post-receive chain.
    fn register_inbound(
        &mut self,
        on_response: OnFulfilled<Response>,
        on_error: OnRejected<Response>,
    ) -> HookHandle;

    /// Remove a hook. Returns whether a live hook was removed.
    fn deregister(&mut self, handle: HookHandle) -> bool;
}
