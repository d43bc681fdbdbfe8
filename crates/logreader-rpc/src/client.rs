//! RPC client for the log server.
//!
//! Owns one TCP connection, frames inbound bytes through [`JsonRpcCodec`],
//! and correlates responses to waiting callers through the
//! [`RequestRegistry`].
//!
//! # Protocol constraint
//!
//! The server's framing assumes at most one complete message is buffered
//! at a time (see [`crate::transport`]). Concurrent [`RpcClient::call`]s
//! are fine at the API level - each gets its own id and completion handle -
//! but on the wire the peer must answer outstanding requests one at a
//! time. Callers that pipeline writes faster than replies can be framed
//! are outside the protocol's guarantees.
//!
//! No per-call timeout is applied: a call whose response never arrives
//! waits until the connection is torn down. Callers needing bounded
//! latency wrap the call in their own timeout.

use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::protocol::Request;
use crate::registry::RequestRegistry;
use crate::transport::JsonRpcCodec;

type Transport = Framed<TcpStream, JsonRpcCodec>;
type WriteHalf = SplitSink<Transport, Request>;
type ReadHalf = SplitStream<Transport>;

/// Connection lifecycle state, owned exclusively by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// JSON-RPC client for communicating with the log server
pub struct RpcClient {
    state: Arc<Mutex<ConnectionState>>,
    registry: Arc<RequestRegistry>,
    sink: Arc<Mutex<Option<WriteHalf>>>,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl RpcClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ConnectionState::Disconnected)),
            registry: Arc::new(RequestRegistry::new()),
            sink: Arc::new(Mutex::new(None)),
            reader: Mutex::new(None),
        }
    }

    /// Current connection state.
    pub async fn state(&self) -> ConnectionState {
        *self.state.lock().await
    }

    /// Connect to the log server listening on `127.0.0.1:port`.
    ///
    /// # Errors
    ///
    /// Returns `Error::AlreadyConnected` unless the client is currently
    /// disconnected, and `Error::Io` if the socket connection fails (the
    /// client then reverts to `Disconnected`).
    pub async fn connect(&self, port: u16) -> Result<()> {
        {
            let mut state = self.state.lock().await;
            if *state != ConnectionState::Disconnected {
                return Err(Error::AlreadyConnected);
            }
            *state = ConnectionState::Connecting;
        }

        let stream = match TcpStream::connect(("127.0.0.1", port)).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(port, "connection failed: {e}");
                *self.state.lock().await = ConnectionState::Disconnected;
                return Err(e.into());
            }
        };

        debug!(port, "connected to log server");

        let (sink, stream) = Framed::new(stream, JsonRpcCodec::new()).split();
        *self.sink.lock().await = Some(sink);

        // Must be Connected before the reader starts; the reader may
        // observe EOF right away
        *self.state.lock().await = ConnectionState::Connected;

        let handle = tokio::spawn(read_loop(
            stream,
            Arc::clone(&self.registry),
            Arc::clone(&self.state),
        ));
        *self.reader.lock().await = Some(handle);

        Ok(())
    }

    /// Send a request and wait for its response.
    ///
    /// The decoded second-level payload is deserialized into `T`.
    ///
    /// # Errors
    ///
    /// Fails immediately with `Error::NotConnected` when not connected
    /// (the socket is never touched). Otherwise fails if the write fails
    /// (tearing the connection down), if the response carries an `error`
    /// member, if the payload decode fails, or with
    /// `Error::ConnectionClosed` when the connection is torn down while
    /// the call is pending.
    pub async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T> {
        if *self.state.lock().await != ConnectionState::Connected {
            return Err(Error::NotConnected);
        }

        let id = self.registry.allocate();
        let request = Request::new(method, params, id);

        let rx = {
            let mut sink_slot = self.sink.lock().await;
            let Some(sink) = sink_slot.as_mut() else {
                // Torn down between the state check and here
                return Err(Error::NotConnected);
            };

            let rx = self.registry.register(id).await;
            trace!(id, method, "sending request");

            if let Err(e) = sink.send(request).await {
                warn!(id, "socket write failed: {e}");
                sink_slot.take();
                drop(sink_slot);
                let reason = e.to_string();
                self.teardown(|| Error::Io(std::io::Error::other(reason.clone())))
                    .await;
                return Err(e.into());
            }

            rx
        };

        match rx.await {
            Ok(outcome) => Ok(serde_json::from_value(outcome?)?),
            // Sender dropped without completing; only teardown races do this
            Err(_) => Err(Error::ConnectionClosed),
        }
    }

    /// Close the connection and fail every pending call with
    /// `Error::ConnectionClosed`.
    ///
    /// Idempotent: disconnecting an already-disconnected client does
    /// nothing.
    pub async fn disconnect(&self) {
        let Some(mut sink) = self.sink.lock().await.take() else {
            return;
        };

        debug!("disconnecting from log server");

        // Half-close; no further writes happen after this
        let _ = sink.close().await;

        self.teardown(|| Error::ConnectionClosed).await;
    }

    /// Drop to `Disconnected`, stop the reader, and fail all pending calls.
    async fn teardown(&self, make_error: impl Fn() -> Error) {
        if let Some(handle) = self.reader.lock().await.take() {
            handle.abort();
        }
        *self.state.lock().await = ConnectionState::Disconnected;
        self.registry.fail_all(make_error).await;
    }
}

impl Default for RpcClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Single ordered consumer of inbound data for one connection.
async fn read_loop(
    mut stream: ReadHalf,
    registry: Arc<RequestRegistry>,
    state: Arc<Mutex<ConnectionState>>,
) {
    while let Some(item) = stream.next().await {
        match item {
            Ok(response) => {
                trace!(id = ?response.id, "inbound message");
                registry.resolve(response).await;
            }
            Err(e) => {
                warn!("socket read failed: {e}");
                *state.lock().await = ConnectionState::Disconnected;
                let reason = e.to_string();
                registry
                    .fail_all(|| Error::Io(std::io::Error::other(reason.clone())))
                    .await;
                return;
            }
        }
    }

    debug!("server closed the connection");
    *state.lock().await = ConnectionState::Disconnected;
    registry.fail_all(|| Error::ConnectionClosed).await;
}
