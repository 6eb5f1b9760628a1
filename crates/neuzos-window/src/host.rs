//! UI runtime seam

use serde_json::Value;

use neuzos_config::ThemeMode;

use crate::geometry::WorkArea;
use crate::window_spec::WindowSpec;

/// The desktop runtime that owns real windows.
///
/// Windows are addressed by label. `close` goes through the runtime's
/// close-requested path (and therefore the close guard); `destroy` does not.
/// Implementations report window events back into the controller.
pub trait WindowHost: Send + Sync {
    /// Build a hidden window; it is shown once the host reports it ready.
    fn create(&self, spec: &WindowSpec) -> Result<(), String>;

    /// Whether a live, non-destroyed window with this label exists.
    fn is_alive(&self, label: &str) -> bool;

    fn show(&self, label: &str) -> Result<(), String>;

    fn focus(&self, label: &str) -> Result<(), String>;

    fn close(&self, label: &str) -> Result<(), String>;

    fn destroy(&self, label: &str) -> Result<(), String>;

    fn minimize(&self, label: &str) -> Result<(), String>;

    fn toggle_maximize(&self, label: &str) -> Result<(), String>;

    fn is_fullscreen(&self, label: &str) -> bool;

    fn set_fullscreen(&self, label: &str, fullscreen: bool) -> Result<(), String>;

    /// Push a named event to the page in a window.
    fn emit(&self, label: &str, event: &str, payload: Value) -> Result<(), String>;

    fn set_theme(&self, mode: ThemeMode);

    fn work_area(&self) -> Option<WorkArea>;

    /// Start a detached copy of this executable with `args`.
    fn launch_instance(&self, args: &[String]) -> Result<(), String>;
}
