//! Shared payload types for logreader components.
//!
//! These types describe the `get_logfiles` payload carried over RPC. The
//! RPC client itself does not interpret them - it transports opaque JSON -
//! so they live in their own crate for the callers that do.

use serde::{Deserialize, Serialize};

/// Parameters for the `get_logfiles` method.
///
/// An empty search string matches every log file the server can see.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogFileQuery {
    pub filename_search_string: String,
}

impl LogFileQuery {
    #[must_use]
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            filename_search_string: search.into(),
        }
    }
}

/// One log file reported by the server.
///
/// The server sends either `content` (possibly truncated) or a per-file
/// `error`; an errored entry carries no `content` member at all, so it
/// defaults to empty here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogFile {
    pub path: String,

    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogFile {
    /// Whether the server could not read this file.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Whether the content was cut off at the server's read limit.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.truncated.unwrap_or(false)
    }
}

/// Result payload of `get_logfiles`: every matching file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogFileList {
    pub files: Vec<LogFile>,
}
