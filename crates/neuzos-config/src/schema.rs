//! Config document schema

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::vocabulary::KeybindEvent;

/// Partition override that pins a session to the shared, unpartitioned context.
pub const BROWSER_PARTITION: &str = "browser";

pub const DEFAULT_GAME_URL: &str = "https://universe.flyff.com/play";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub launch_defaults: LaunchDefaults,
    pub chromium_switches: Vec<String>,
    pub preferences: Preferences,
    pub sessions: Vec<Session>,
    pub layouts: Vec<Layout>,
    pub key_binds: Vec<KeyBind>,
    /// Owned by the UI layer; carried through untouched
    pub session_actions: Vec<Value>,
    /// Top-level keys the launcher does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchDefaults {
    /// Raw mode name; only `normal` and `session_launcher` are honored
    pub default_launch_mode: String,
    #[serde(default)]
    pub default_layouts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme_mode: ThemeMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Dark,
    Light,
    #[default]
    System,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
            ThemeMode::System => "system",
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub label: String,
    pub icon: Icon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_overwrite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_overwrite: Option<String>,
}

impl Session {
    /// True when the session runs in the shared default context instead of
    /// its own partition. Such sessions cannot be opened standalone.
    pub fn uses_browser_partition(&self) -> bool {
        self.partition_overwrite.as_deref() == Some(BROWSER_PARTITION)
    }

    pub fn game_url(&self) -> &str {
        self.src_overwrite
            .as_deref()
            .filter(|src| !src.trim().is_empty())
            .unwrap_or(DEFAULT_GAME_URL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Icon {
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub icon: Icon,
    #[serde(default)]
    pub rows: Vec<LayoutRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRow {
    pub session_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBind {
    /// Accelerator string, e.g. `CommandOrControl+Shift+1`
    pub key: String,
    pub event: KeybindEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
}

impl KeyBind {
    pub fn new(key: impl Into<String>, event: KeybindEvent) -> Self {
        Self {
            key: key.into(),
            event,
            args: None,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = Some(args);
        self
    }

    pub fn args(&self) -> &[String] {
        self.args.as_deref().unwrap_or(&[])
    }
}

impl Config {
    pub fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    pub fn layout(&self, layout_id: &str) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.id == layout_id)
    }

    /// The built-in default as a JSON object, used as the merge base on load.
    pub fn default_document() -> Map<String, Value> {
        match serde_json::to_value(Config::default()) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            launch_defaults: LaunchDefaults {
                default_launch_mode: "normal".to_string(),
                default_layouts: Vec::new(),
            },
            chromium_switches: Vec::new(),
            preferences: Preferences {
                theme_mode: ThemeMode::System,
            },
            sessions: Vec::new(),
            layouts: Vec::new(),
            key_binds: vec![
                KeyBind::new("F11", KeybindEvent::FullscreenToggle),
                KeyBind::new("Control+Tab", KeybindEvent::LayoutSwap),
            ],
            session_actions: Vec::new(),
            extra: Map::new(),
        }
    }
}
