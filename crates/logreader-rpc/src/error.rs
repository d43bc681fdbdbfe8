//! Error types for the logreader-rpc crate.

use crate::transport::CodecError;

/// Unified error type for RPC client operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Not connected")]
    NotConnected,

    #[error("Already connecting or connected")]
    AlreadyConnected,

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("RPC error response: {0}")]
    Rpc(String),
}

pub type Result<T> = std::result::Result<T, Error>;
