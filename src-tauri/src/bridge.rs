//! IPC bridge
//!
//! The UI talks to the launcher through a single `dispatch` command that
//! carries a channel name and its payload.

use serde_json::Value;
use tauri::{AppHandle, State};

use neuzos_core::{ApplicationState, Command, CommandResult};

use crate::fatal;

#[tauri::command]
pub async fn dispatch(
    app: AppHandle,
    state: State<'_, ApplicationState>,
    channel: String,
    payload: Option<Value>,
) -> Result<CommandResult<Value>, String> {
    let command = match Command::from_channel(&channel, payload.unwrap_or(Value::Null)) {
        Ok(command) => command,
        Err(e) => {
            tracing::warn!(channel = %channel, "Rejected command: {}", e);
            return Ok(CommandResult::err(e.to_string()));
        }
    };

    tracing::debug!(channel = %channel, "Dispatching command");
    match state.dispatch(command).await {
        Ok(data) => Ok(CommandResult::ok(data)),
        Err(e) => {
            let message = e.to_string();
            if e.is_fatal() {
                fatal::report(&app, e);
            } else {
                tracing::warn!(channel = %channel, "Command failed: {}", message);
            }
            Ok(CommandResult::err(message))
        }
    }
}
