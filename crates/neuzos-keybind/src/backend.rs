//! Global hotkey seam

use crate::accelerator::Accelerator;

/// System-wide hotkey registration owned by the UI runtime.
///
/// Only one registration set exists at a time, so there is no per-key
/// unregister; the dispatcher always tears everything down at once.
pub trait HotkeyBackend: Send + Sync {
    fn register(&self, accelerator: &Accelerator) -> Result<(), String>;

    /// Must succeed when nothing is registered.
    fn unregister_all(&self) -> Result<(), String>;
}
