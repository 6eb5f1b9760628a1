//! Launch modes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use neuzos_window::StandaloneMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchMode {
    /// Primary window with tabs and layouts
    Normal,
    /// Small session picker
    SessionLauncher,
    /// One session, fullscreen toggles freely
    Session,
    /// One session, fullscreen locked off
    Focus,
    /// One session, fullscreen locked on
    FocusFullscreen,
}

impl LaunchMode {
    pub const ALL: [LaunchMode; 5] = [
        LaunchMode::Normal,
        LaunchMode::SessionLauncher,
        LaunchMode::Session,
        LaunchMode::Focus,
        LaunchMode::FocusFullscreen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchMode::Normal => "normal",
            LaunchMode::SessionLauncher => "session_launcher",
            LaunchMode::Session => "session",
            LaunchMode::Focus => "focus",
            LaunchMode::FocusFullscreen => "focus_fullscreen",
        }
    }

    /// Modes that may come from `launchDefaults.defaultLaunchMode`. The
    /// session-bound ones have to be asked for explicitly.
    pub fn allowed_as_default(&self) -> bool {
        matches!(self, LaunchMode::Normal | LaunchMode::SessionLauncher)
    }

    pub fn standalone_mode(&self) -> Option<StandaloneMode> {
        match self {
            LaunchMode::Session => Some(StandaloneMode::Session),
            LaunchMode::Focus => Some(StandaloneMode::Focus),
            LaunchMode::FocusFullscreen => Some(StandaloneMode::FocusFullscreen),
            LaunchMode::Normal | LaunchMode::SessionLauncher => None,
        }
    }

    pub fn is_session_bound(&self) -> bool {
        self.standalone_mode().is_some()
    }
}

impl From<StandaloneMode> for LaunchMode {
    fn from(mode: StandaloneMode) -> Self {
        match mode {
            StandaloneMode::Session => LaunchMode::Session,
            StandaloneMode::Focus => LaunchMode::Focus,
            StandaloneMode::FocusFullscreen => LaunchMode::FocusFullscreen,
        }
    }
}

impl fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LaunchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LaunchMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("Unknown launch mode: {}", s))
    }
}
