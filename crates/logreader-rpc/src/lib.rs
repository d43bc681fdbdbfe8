//! JSON-RPC client core for the logreader log server.
//!
//! This crate owns the hard part of talking to the long-lived external
//! log server over TCP: connection lifecycle, framing inbound bytes into
//! discrete JSON-RPC messages, correlating each reply to the request that
//! produced it, and resolving exactly one waiting caller per reply.
//!
//! # Architecture
//!
//! - [`protocol`]: JSON-RPC 2.0 wire types (Request, Response envelope)
//! - [`transport`]: whole-buffer codec for message framing
//! - [`registry`]: pending-request map and id allocation
//! - [`client`]: the RPC client and its connection lifecycle
//! - [`helpers`]: typed wrappers for the log server's methods
//! - [`error`]: unified error type and Result alias
//!
//! # Example
//!
//! ```no_run
//! use logreader_rpc::{RpcClient, fetch_log_files};
//!
//! # async fn example() -> logreader_rpc::Result<()> {
//! let client = RpcClient::new();
//! client.connect(4815).await?;
//!
//! let logs = fetch_log_files(&client, "app").await?;
//! println!("{} log files", logs.files.len());
//!
//! client.disconnect().await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod helpers;
pub mod protocol;
pub mod registry;
pub mod transport;

// Re-export main client types
pub use client::{ConnectionState, RpcClient};

// Re-export helper functions
pub use helpers::fetch_log_files;

// Re-export error types
pub use error::{Error, Result};

// Re-export protocol types
pub use protocol::{JSONRPC_VERSION, Request, Response};

// Re-export registry and transport types
pub use registry::RequestRegistry;
pub use transport::{CodecError, JsonRpcCodec};

// Re-export the payload types callers deserialize into
pub use logreader_types::{LogFile, LogFileList, LogFileQuery};
