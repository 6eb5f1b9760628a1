//! Session partition error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session id cannot be empty")]
    EmptySessionId,

    /// The partition directory derived from a session id would land outside
    /// the partitions root.
    #[error("Partition path for session {session_id} escapes {root}")]
    PathEscape { session_id: String, root: PathBuf },

    #[error("Browsing context for {partition} failed: {reason}")]
    Runtime { partition: String, reason: String },
}
