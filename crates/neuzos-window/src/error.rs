//! Window error types

use thiserror::Error;

use crate::role::WindowRole;

#[derive(Error, Debug)]
pub enum WindowError {
    #[error("Session not found in config: {0}")]
    UnknownSession(String),

    #[error("Session {0} uses the shared browser partition and cannot be opened standalone")]
    SharedPartition(String),

    #[error("No {0} window is open")]
    NotOpen(WindowRole),

    #[error("Window host failed for {role} window: {reason}")]
    Host { role: WindowRole, reason: String },
}
