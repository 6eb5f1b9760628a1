//! Tauri implementations of the core runtime seams

mod contexts;
mod hotkeys;
mod window_host;

pub use contexts::TauriBrowsingContexts;
pub use hotkeys::TauriHotkeys;
pub use window_host::TauriWindowHost;
