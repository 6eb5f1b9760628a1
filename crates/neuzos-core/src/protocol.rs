//! Bridge protocol
//!
//! Pages talk to the core through named channels. The set of channels is
//! closed: every inbound command is a variant of [`Command`] with a fixed
//! payload shape, and every outbound event is a [`UiEvent`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use neuzos_config::{Config, KeybindEvent, ThemeMode};
use neuzos_window::{StandaloneMode, WindowSize};

use crate::error::CoreError;
use crate::tabs::TabsSnapshot;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "channel", content = "payload")]
pub enum Command {
    #[serde(rename = "main_window.minimize")]
    MainWindowMinimize,
    #[serde(rename = "main_window.maximize")]
    MainWindowMaximize,
    #[serde(rename = "main_window.close")]
    MainWindowClose,
    #[serde(rename = "main_window.destroy")]
    MainWindowDestroy,
    #[serde(rename = "main_window.reload_config")]
    MainWindowReloadConfig,

    #[serde(rename = "settings_window.open")]
    SettingsWindowOpen,
    #[serde(rename = "settings_window.minimize")]
    SettingsWindowMinimize,
    #[serde(rename = "settings_window.maximize")]
    SettingsWindowMaximize,
    #[serde(rename = "settings_window.close")]
    SettingsWindowClose,
    #[serde(rename = "settings_window.destroy")]
    SettingsWindowDestroy,

    #[serde(rename = "session_launcher.open")]
    SessionLauncherOpen,
    #[serde(rename = "session_launcher.minimize")]
    SessionLauncherMinimize,
    #[serde(rename = "session_launcher.close")]
    SessionLauncherClose,
    #[serde(rename = "session_launcher.destroy")]
    SessionLauncherDestroy,

    #[serde(rename = "session.start", rename_all = "camelCase")]
    SessionStart {
        session_id: String,
        #[serde(default)]
        layout_id: Option<String>,
    },
    #[serde(rename = "session.stop", rename_all = "camelCase")]
    SessionStop { session_id: String },
    #[serde(rename = "session.restart", rename_all = "camelCase")]
    SessionRestart { session_id: String },
    #[serde(rename = "session.clear_cache", rename_all = "camelCase")]
    SessionClearCache { session_id: String },
    #[serde(rename = "session.clear_storage", rename_all = "camelCase")]
    SessionClearStorage { session_id: String },
    #[serde(rename = "session.destroy", rename_all = "camelCase")]
    SessionDestroy { session_id: String },
    /// Open the session in this process's standalone window
    #[serde(rename = "session.popout", rename_all = "camelCase")]
    SessionPopout {
        session_id: String,
        #[serde(default)]
        size: Option<WindowSize>,
    },
    /// Start a separate launcher process bound to the session
    #[serde(rename = "session.launch", rename_all = "camelCase")]
    SessionLaunch {
        session_id: String,
        mode: StandaloneMode,
    },

    #[serde(rename = "tabs.add", rename_all = "camelCase")]
    TabsAdd { layout_id: String },
    #[serde(rename = "tabs.switch", rename_all = "camelCase")]
    TabsSwitch { layout_id: String },
    #[serde(rename = "tabs.close", rename_all = "camelCase")]
    TabsClose { layout_id: String },
    #[serde(rename = "tabs.close_all")]
    TabsCloseAll,

    #[serde(rename = "config.load", rename_all = "camelCase")]
    ConfigLoad {
        #[serde(default)]
        force_reload: bool,
    },
    #[serde(rename = "config.save")]
    ConfigSave { config: Box<Config> },
    #[serde(rename = "config.get_available_switches")]
    ConfigGetAvailableSwitches,
    #[serde(rename = "config.get_available_keybind_vocabulary")]
    ConfigGetAvailableKeybindVocabulary,

    #[serde(rename = "preferences.set_theme_mode", rename_all = "camelCase")]
    PreferencesSetThemeMode { theme_mode: ThemeMode },

    #[serde(rename = "fetch.news")]
    FetchNews { url: String },
    #[serde(rename = "fetch.default_user_agent")]
    FetchDefaultUserAgent,
}

impl Command {
    pub const CHANNELS: &'static [&'static str] = &[
        "main_window.minimize",
        "main_window.maximize",
        "main_window.close",
        "main_window.destroy",
        "main_window.reload_config",
        "settings_window.open",
        "settings_window.minimize",
        "settings_window.maximize",
        "settings_window.close",
        "settings_window.destroy",
        "session_launcher.open",
        "session_launcher.minimize",
        "session_launcher.close",
        "session_launcher.destroy",
        "session.start",
        "session.stop",
        "session.restart",
        "session.clear_cache",
        "session.clear_storage",
        "session.destroy",
        "session.popout",
        "session.launch",
        "tabs.add",
        "tabs.switch",
        "tabs.close",
        "tabs.close_all",
        "config.load",
        "config.save",
        "config.get_available_switches",
        "config.get_available_keybind_vocabulary",
        "preferences.set_theme_mode",
        "fetch.news",
        "fetch.default_user_agent",
    ];

    /// Decode a command from its channel name and payload.
    ///
    /// Unknown channels are rejected before the payload is looked at. A
    /// null payload means "no payload".
    pub fn from_channel(channel: &str, payload: Value) -> Result<Self> {
        if !Self::CHANNELS.contains(&channel) {
            return Err(CoreError::UnknownCommand(channel.to_string()));
        }

        let mut envelope = Map::new();
        envelope.insert("channel".to_string(), Value::String(channel.to_string()));
        if !payload.is_null() {
            envelope.insert("payload".to_string(), payload);
        }

        serde_json::from_value(Value::Object(envelope)).map_err(|e| CoreError::InvalidPayload {
            channel: channel.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Events pushed from the core to pages.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    ConfigChanged(Box<Config>),
    ThemeModeChanged(ThemeMode),
    ReloadConfig,
    SessionStarted {
        session_id: String,
        layout_id: Option<String>,
    },
    SessionStopped {
        session_id: String,
    },
    TabsChanged(TabsSnapshot),
    SessionResized {
        session_id: String,
        width: u32,
        height: u32,
    },
    /// A fired keybind forwarded under its vocabulary name
    Keybind {
        event: KeybindEvent,
        args: Vec<String>,
    },
    Custom {
        name: String,
        payload: Vec<String>,
    },
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::ConfigChanged(_) => "config-changed",
            UiEvent::ThemeModeChanged(_) => "theme-mode-changed",
            UiEvent::ReloadConfig => "reload-config",
            UiEvent::SessionStarted { .. } => "session-started",
            UiEvent::SessionStopped { .. } => "session-stopped",
            UiEvent::TabsChanged(_) => "tabs-changed",
            UiEvent::SessionResized { .. } => "session-resized",
            UiEvent::Keybind { event, .. } => event.as_str(),
            UiEvent::Custom { .. } => KeybindEvent::CustomEvent.as_str(),
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            UiEvent::ConfigChanged(config) => serde_json::to_value(config).unwrap_or_default(),
            UiEvent::ThemeModeChanged(mode) => json!({ "themeMode": mode }),
            UiEvent::ReloadConfig => Value::Null,
            UiEvent::SessionStarted {
                session_id,
                layout_id,
            } => json!({ "sessionId": session_id, "layoutId": layout_id }),
            UiEvent::SessionStopped { session_id } => json!({ "sessionId": session_id }),
            UiEvent::TabsChanged(snapshot) => serde_json::to_value(snapshot).unwrap_or_default(),
            UiEvent::SessionResized {
                session_id,
                width,
                height,
            } => json!({ "sessionId": session_id, "width": width, "height": height }),
            UiEvent::Keybind { args, .. } => json!({ "args": args }),
            UiEvent::Custom { name, payload } => json!({ "name": name, "payload": payload }),
        }
    }
}

/// Reply envelope returned to pages, in the shape every bridge call uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}
