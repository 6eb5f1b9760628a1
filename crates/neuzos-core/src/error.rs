//! Core error types

use std::path::PathBuf;
use thiserror::Error;

use neuzos_config::ConfigError;
use neuzos_keybind::KeybindError;
use neuzos_launch::LaunchError;
use neuzos_session::SessionError;
use neuzos_window::WindowError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[source] ConfigError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    #[error("Invalid launch parameters: {0}")]
    Launch(#[from] LaunchError),

    #[error("Cannot open session window: {0}")]
    InvalidStandalone(#[source] WindowError),

    #[error("Cannot open session window: {0}")]
    StandalonePartition(#[source] SessionError),

    #[error("Failed to register keybinds from {}: {source}", .config_path.display())]
    KeybindRegistration {
        config_path: PathBuf,
        #[source]
        source: KeybindError,
    },

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid payload for {channel}: {reason}")]
    InvalidPayload { channel: String, reason: String },

    #[error("Unknown session: {0}")]
    UnknownSession(String),

    #[error("Session is not running: {0}")]
    SessionNotRunning(String),

    #[error("Unknown layout: {0}")]
    UnknownLayout(String),

    #[error("Failed to start session process: {0}")]
    Spawn(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Errors the process cannot continue from. The shell shows these in a
    /// blocking dialog and exits; everything else is logged and returned.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CoreError::ConfigLoad(_)
                | CoreError::Launch(_)
                | CoreError::InvalidStandalone(_)
                | CoreError::StandalonePartition(_)
                | CoreError::KeybindRegistration { .. }
        )
    }
}
