//! JSON-RPC 2.0 wire types for the log server protocol.
//!
//! The log server speaks a narrow slice of JSON-RPC 2.0: every outgoing
//! message is a request with a positive integer id, and every inbound
//! message is a response envelope. There are no notifications in either
//! direction.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 Request.
///
/// Field declaration order is wire order: `jsonrpc`, `method`, `params`,
/// `id`, which is what the server expects to read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
    pub id: u64,
}

impl Request {
    #[must_use]
    pub fn new(method: impl Into<String>, params: Value, id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

/// JSON-RPC response envelope as the log server sends it.
///
/// `result` is a JSON-encoded *string* holding the actual payload; the
/// registry decodes it a second time before completing the waiting call.
/// `error` is not interpreted beyond its presence. Anything else the peer
/// includes is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}
