//! Fatal error reporting
//!
//! Errors the launcher cannot run past (unreadable config, bad launch
//! arguments, keybinds that fail to register) end the process after a
//! blocking error dialog. Everything else is logged.

use tauri::AppHandle;
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

use neuzos_core::CoreError;

pub fn report(app: &AppHandle, error: CoreError) {
    if !error.is_fatal() {
        tracing::warn!("{}", error);
        return;
    }

    tracing::error!("Fatal: {}", error);

    let exit_handle = app.clone();
    app.dialog()
        .message(error.to_string())
        .title("NeuzOS")
        .kind(MessageDialogKind::Error)
        .show(move |_| exit_handle.exit(1));
}
