//! NeuzOS Configuration
//!
//! A single JSON document is the source of truth for sessions, layouts,
//! keybinds and launch defaults. Loading always deep-fills the built-in
//! default schema and strips values the launcher does not understand;
//! nothing in the document is ever fatal except an unreadable file.

mod error;
mod paths;
mod sanitize;
mod schema;
mod store;
mod vocabulary;

pub use error::ConfigError;
pub use paths::{config_dir, CONFIG_FILE_NAME};
pub use sanitize::{available_switches, sanitize_document, ALLOWED_SWITCHES};
pub use schema::{
    Config, Icon, KeyBind, LaunchDefaults, Layout, LayoutRow, Preferences, Session, ThemeMode,
    BROWSER_PARTITION, DEFAULT_GAME_URL,
};
pub use store::ConfigStore;
pub use vocabulary::{available_keybind_events, KeybindEvent};

pub type Result<T> = std::result::Result<T, ConfigError>;
