//! Window roles

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowRole {
    /// Tab/layout host, lives as long as the app
    Primary,
    /// Settings editor, always re-created fresh
    Settings,
    /// Small fixed-size session picker
    SessionLauncher,
    /// One window bound to one session partition
    StandaloneSession,
}

impl WindowRole {
    pub const ALL: [WindowRole; 4] = [
        WindowRole::Primary,
        WindowRole::Settings,
        WindowRole::SessionLauncher,
        WindowRole::StandaloneSession,
    ];

    /// Runtime window label; one per role since each role is single-instance.
    pub fn label(&self) -> &'static str {
        match self {
            WindowRole::Primary => "main",
            WindowRole::Settings => "settings",
            WindowRole::SessionLauncher => "session-launcher",
            WindowRole::StandaloneSession => "session",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        WindowRole::ALL.into_iter().find(|role| role.label() == label)
    }

    /// Roles hosting live game state require a confirmed close.
    pub fn close_guarded(&self) -> bool {
        matches!(self, WindowRole::Primary | WindowRole::StandaloneSession)
    }

    /// The settings window hosts the keybind editor and must see raw keys.
    pub fn receives_keybinds(&self) -> bool {
        !matches!(self, WindowRole::Settings)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WindowRole::Primary => "primary",
            WindowRole::Settings => "settings",
            WindowRole::SessionLauncher => "session_launcher",
            WindowRole::StandaloneSession => "standalone_session",
        }
    }
}

impl std::fmt::Display for WindowRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a standalone-session window treats fullscreen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandaloneMode {
    /// Fullscreen toggles freely
    Session,
    /// Fullscreen toggle is swallowed
    Focus,
    /// Starts fullscreen and is forced back if it ever leaves
    FocusFullscreen,
}

impl StandaloneMode {
    pub fn allows_fullscreen_toggle(&self) -> bool {
        matches!(self, StandaloneMode::Session)
    }

    pub fn pins_fullscreen(&self) -> bool {
        matches!(self, StandaloneMode::FocusFullscreen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for role in WindowRole::ALL {
            assert_eq!(WindowRole::from_label(role.label()), Some(role));
        }
        assert_eq!(WindowRole::from_label("ui-main"), None);
    }

    #[test]
    fn test_guarded_roles() {
        assert!(WindowRole::Primary.close_guarded());
        assert!(WindowRole::StandaloneSession.close_guarded());
        assert!(!WindowRole::Settings.close_guarded());
        assert!(!WindowRole::SessionLauncher.close_guarded());
    }
}
