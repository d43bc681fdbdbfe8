//! Typed wrappers over the raw `call` surface.

use logreader_types::{LogFileList, LogFileQuery};

use crate::client::RpcClient;
use crate::error::Result;

/// Fetch every log file whose name contains `search` (empty matches all).
///
/// # Errors
///
/// Returns an error if the client is not connected, the request fails, or
/// the payload does not deserialize into a [`LogFileList`].
pub async fn fetch_log_files(client: &RpcClient, search: &str) -> Result<LogFileList> {
    let query = LogFileQuery::new(search);
    client
        .call("get_logfiles", serde_json::to_value(query)?)
        .await
}
