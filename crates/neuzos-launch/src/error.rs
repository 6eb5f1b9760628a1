//! Error types for launch resolution

use thiserror::Error;

use crate::mode::LaunchMode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    #[error("Launch mode '{0}' requires --session_id=<id>")]
    MissingSessionId(LaunchMode),

    #[error("Launch mode '{0}' does not host a single session")]
    NotSessionMode(LaunchMode),
}
