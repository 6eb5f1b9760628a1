//! Keybind event vocabulary
//!
//! The set of events a keybind may trigger is closed. Anything else found in
//! the document is dropped during sanitization.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeybindEvent {
    /// Swap back to the previously active layout
    LayoutSwap,
    /// Toggle fullscreen on the focused window
    FullscreenToggle,
    /// Switch to a layout by id
    LayoutSwitch,
    /// Trigger a session action in a running session
    SendSessionAction,
    /// Forward an arbitrary named event to the UI
    CustomEvent,
}

impl KeybindEvent {
    pub const ALL: [KeybindEvent; 5] = [
        KeybindEvent::LayoutSwap,
        KeybindEvent::FullscreenToggle,
        KeybindEvent::LayoutSwitch,
        KeybindEvent::SendSessionAction,
        KeybindEvent::CustomEvent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KeybindEvent::LayoutSwap => "layout_swap",
            KeybindEvent::FullscreenToggle => "fullscreen_toggle",
            KeybindEvent::LayoutSwitch => "layout_switch",
            KeybindEvent::SendSessionAction => "send_session_action",
            KeybindEvent::CustomEvent => "custom_event",
        }
    }

    /// Positional args a bind must carry before the event is forwarded.
    pub fn required_args(&self) -> usize {
        match self {
            KeybindEvent::LayoutSwap | KeybindEvent::FullscreenToggle => 0,
            KeybindEvent::LayoutSwitch | KeybindEvent::CustomEvent => 1,
            KeybindEvent::SendSessionAction => 2,
        }
    }

    /// Events with at most one operational purpose. Collisions on the same
    /// accelerator are not resolved; the last registration wins.
    pub fn is_unique(&self) -> bool {
        matches!(
            self,
            KeybindEvent::LayoutSwap | KeybindEvent::FullscreenToggle
        )
    }

    pub fn is_allowed(name: &str) -> bool {
        name.parse::<KeybindEvent>().is_ok()
    }
}

/// Event names a keybind may use, for the settings editor.
pub fn available_keybind_events() -> Vec<&'static str> {
    KeybindEvent::ALL.iter().map(|event| event.as_str()).collect()
}

impl std::fmt::Display for KeybindEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for KeybindEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeybindEvent::ALL
            .iter()
            .copied()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| format!("Unknown keybind event: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for event in KeybindEvent::ALL {
            assert_eq!(event.as_str().parse::<KeybindEvent>().unwrap(), event);
        }
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!(!KeybindEvent::is_allowed("Fullscreen_Toggle"));
        assert!(!KeybindEvent::is_allowed(""));
        assert!(KeybindEvent::is_allowed("custom_event"));
    }

    #[test]
    fn test_unique_events() {
        assert!(KeybindEvent::FullscreenToggle.is_unique());
        assert!(KeybindEvent::LayoutSwap.is_unique());
        assert!(!KeybindEvent::SendSessionAction.is_unique());
    }
}
