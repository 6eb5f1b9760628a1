//! NeuzOS Core
//!
//! Coordination layer for the launcher: owns the `ApplicationState`,
//! decodes bridge commands, and drives the window, keybind and session
//! components from window-runtime callbacks. The UI runtime itself stays
//! behind the seams in `neuzos-window`, `neuzos-keybind` and
//! `neuzos-session`.

mod commands;
mod error;
pub mod fetch;
mod protocol;
mod state;
mod tabs;

#[cfg(test)]
mod fixture;

pub use error::CoreError;
pub use protocol::{Command, CommandResult, UiEvent};
pub use state::{browser_args, ApplicationState};
pub use tabs::{LayoutTabs, TabsSnapshot};

// Re-export the component crates for the shell
pub use neuzos_config as config;
pub use neuzos_keybind as keybind;
pub use neuzos_launch as launch;
pub use neuzos_session as session;
pub use neuzos_window as window;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
