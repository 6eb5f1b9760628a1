//! NeuzOS Keybinds
//!
//! Turns the declarative `keyBinds` list into live global hotkeys for the
//! focused window, and turns fired hotkeys back into launcher actions.

mod accelerator;
mod backend;
mod dispatcher;
mod error;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use accelerator::{
    Accelerator, MOD_ALT, MOD_ALT_GR, MOD_CMD_OR_CTRL, MOD_COMMAND, MOD_CONTROL, MOD_SHIFT,
    MOD_SUPER,
};
pub use backend::HotkeyBackend;
pub use dispatcher::{KeybindAction, KeybindDispatcher};
pub use error::{AcceleratorError, KeybindError};

pub type Result<T> = std::result::Result<T, KeybindError>;
