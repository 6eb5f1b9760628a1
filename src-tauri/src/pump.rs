//! Window-runtime signal pump
//!
//! Runtime callbacks arrive on the UI thread, sometimes re-entrantly while
//! a window call is still in progress. They are queued here and applied to
//! the application state one at a time, in arrival order, on a single task.

use tauri::{AppHandle, Manager};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use neuzos_core::keybind::Accelerator;
use neuzos_core::window::CloseResponse;
use neuzos_core::ApplicationState;

use crate::fatal;

#[derive(Debug)]
pub enum Signal {
    Focused { label: String, focused: bool },
    /// The runtime close was already prevented; the state decides whether
    /// the window is torn down.
    CloseRequested(String),
    Ready(String),
    Resized {
        label: String,
        width: u32,
        height: u32,
        fullscreen: bool,
    },
    Destroyed(String),
    Hotkey(Accelerator),
}

pub struct SignalPump {
    tx: UnboundedSender<Signal>,
}

impl SignalPump {
    pub fn start(app: AppHandle) -> Self {
        let (tx, mut rx) = unbounded_channel::<Signal>();

        tauri::async_runtime::spawn(async move {
            while let Some(signal) = rx.recv().await {
                apply(&app, signal);
            }
            tracing::debug!("Signal pump stopped");
        });

        Self { tx }
    }

    pub fn send(&self, signal: Signal) {
        if let Err(e) = self.tx.send(signal) {
            tracing::warn!("Dropped window signal after shutdown: {:?}", e.0);
        }
    }
}

fn apply(app: &AppHandle, signal: Signal) {
    let Some(state) = app.try_state::<ApplicationState>() else {
        tracing::debug!("No application state, dropping {:?}", signal);
        return;
    };

    let result = match signal {
        Signal::Focused {
            label,
            focused: true,
        } => state.on_window_focus(&label),
        Signal::Focused {
            label,
            focused: false,
        } => {
            state.on_window_blur(&label);
            Ok(())
        }
        Signal::CloseRequested(label) => {
            if state.on_close_requested(&label) == CloseResponse::Proceed {
                if let Some(window) = app.get_webview_window(&label) {
                    if let Err(e) = window.destroy() {
                        tracing::warn!(label = %label, "Failed to destroy window: {}", e);
                    }
                }
            }
            Ok(())
        }
        Signal::Ready(label) => state.on_window_ready(&label),
        Signal::Resized {
            label,
            width,
            height,
            fullscreen,
        } => {
            state.on_window_resized(&label, width, height);
            state.on_fullscreen_changed(&label, fullscreen)
        }
        Signal::Destroyed(label) => {
            state.on_window_destroyed(&label);
            Ok(())
        }
        Signal::Hotkey(accelerator) => state.on_hotkey(&accelerator),
    };

    if let Err(e) = result {
        fatal::report(app, e);
    }
}
