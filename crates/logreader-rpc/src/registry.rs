//! Pending-request registry.
//!
//! Allocates request ids and holds one completion handle per in-flight
//! call until the matching response arrives or the connection is torn
//! down. Ids start at 1 and increase by 1 for the lifetime of a client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::sync::{Mutex, oneshot};
use tracing::trace;

use crate::error::{Error, Result};
use crate::protocol::Response;

/// Completion handle for one pending call
type Completion = oneshot::Sender<Result<Value>>;

/// Maps in-flight request ids to their waiting callers
#[derive(Debug)]
pub struct RequestRegistry {
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, Completion>>,
}

impl Default for RequestRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Allocate the next request id.
    pub fn allocate(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Register a pending call under `id` and return the receiving half.
    pub async fn register(&self, id: u64) -> oneshot::Receiver<Result<Value>> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);
        rx
    }

    /// Complete the pending call matching `response`, if any.
    ///
    /// Responses without an id, or whose id has no pending call (unknown
    /// or already resolved), are discarded without surfacing an error to
    /// anyone. The `result` string is decoded a second time per the wire
    /// contract; a failed decode fails only that call.
    pub async fn resolve(&self, response: Response) {
        let Some(id) = response.id else {
            trace!("discarding inbound message without an id");
            return;
        };

        let Some(tx) = self.pending.lock().await.remove(&id) else {
            trace!(id, "discarding response with no pending request");
            return;
        };

        let outcome = if let Some(error) = response.error {
            Err(Error::Rpc(error.to_string()))
        } else {
            decode_payload(response.result)
        };

        // The receiver may have been dropped; nothing left to notify then
        let _ = tx.send(outcome);
    }

    /// Fail every pending call and clear the registry.
    pub async fn fail_all(&self, make_error: impl Fn() -> Error) {
        let mut pending = self.pending.lock().await;
        for (_, tx) in pending.drain() {
            let _ = tx.send(Err(make_error()));
        }
    }

    /// Number of calls currently awaiting a response.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

/// Second decode step of the double-encoding contract: `result` holds a
/// JSON-encoded string whose content is the actual payload. A missing
/// `result` decodes like `null` and fails the same way a non-string does.
fn decode_payload(result: Option<Value>) -> Result<Value> {
    let raw: String = serde_json::from_value(result.unwrap_or(Value::Null))?;
    Ok(serde_json::from_str(&raw)?)
}
