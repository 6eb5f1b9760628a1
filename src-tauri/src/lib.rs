//! NeuzOS - Tauri Application
//!
//! The launcher core owns every bit of state; this crate only wires the
//! Tauri runtime to it: windows, global shortcuts, dialogs and the IPC
//! bridge.

mod adapters;
mod bridge;
mod fatal;
mod pump;

use std::sync::Arc;
use tauri::{Manager, RunEvent, WindowEvent};
use tauri_plugin_global_shortcut::ShortcutState;

use adapters::{TauriBrowsingContexts, TauriHotkeys, TauriWindowHost};
use neuzos_core::config::{config_dir, ConfigStore};
use neuzos_core::session::PartitionedSessionManager;
use neuzos_core::window::SystemClock;
use neuzos_core::{ApplicationState, CoreError};
use pump::{Signal, SignalPump};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging
    neuzos_core::init_logging();

    let shortcuts = tauri_plugin_global_shortcut::Builder::new()
        .with_handler(|app, shortcut, event| {
            if event.state != ShortcutState::Pressed {
                return;
            }
            let (Some(hotkeys), Some(pump)) = (
                app.try_state::<Arc<TauriHotkeys>>(),
                app.try_state::<SignalPump>(),
            ) else {
                return;
            };
            if let Some(accelerator) = hotkeys.lookup(shortcut) {
                pump.send(Signal::Hotkey(accelerator));
            }
        })
        .build();

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(shortcuts)
        .setup(|app| {
            let handle = app.handle().clone();
            app.manage(SignalPump::start(handle.clone()));

            let dir = app
                .path()
                .config_dir()
                .map(|dir| dir.join("NeuzOS"))
                .unwrap_or_else(|_| config_dir());
            let config = match ConfigStore::open(dir) {
                Ok(config) => config,
                Err(e) => {
                    fatal::report(&handle, CoreError::ConfigLoad(e));
                    return Ok(());
                }
            };
            let user_data_dir = app.path().app_local_data_dir()?;
            let sessions = PartitionedSessionManager::new(
                Arc::new(TauriBrowsingContexts::new(user_data_dir.clone())),
                user_data_dir,
            );

            let hotkeys = Arc::new(TauriHotkeys::new(handle.clone()));
            let state = ApplicationState::new(
                config,
                sessions,
                Arc::new(TauriWindowHost::new(handle.clone())),
                hotkeys.clone(),
                Arc::new(SystemClock),
            );
            app.manage(hotkeys);
            app.manage(state.clone());

            match state.startup(std::env::args().skip(1)) {
                Ok(plan) => tracing::info!(mode = %plan.mode, "NeuzOS started"),
                Err(e) => fatal::report(&handle, e),
            }
            Ok(())
        })
        .on_window_event(|window, event| {
            let Some(pump) = window.try_state::<SignalPump>() else {
                return;
            };
            let label = window.label().to_string();

            match event {
                WindowEvent::Focused(focused) => pump.send(Signal::Focused {
                    label,
                    focused: *focused,
                }),
                WindowEvent::CloseRequested { api, .. } => {
                    api.prevent_close();
                    pump.send(Signal::CloseRequested(label));
                }
                WindowEvent::Resized(size) => {
                    let scale = window.scale_factor().unwrap_or(1.0);
                    let logical = size.to_logical::<u32>(scale);
                    pump.send(Signal::Resized {
                        label,
                        width: logical.width,
                        height: logical.height,
                        fullscreen: window.is_fullscreen().unwrap_or(false),
                    });
                }
                WindowEvent::Destroyed => pump.send(Signal::Destroyed(label)),
                _ => {}
            }
        })
        .invoke_handler(tauri::generate_handler![bridge::dispatch])
        .build(tauri::generate_context!())
        .expect("error while building NeuzOS");

    app.run(|handle, event| {
        if let RunEvent::ExitRequested { .. } = event {
            // Inline: the pump may not drain before the process exits
            if let Some(state) = handle.try_state::<ApplicationState>() {
                state.on_will_quit();
            }
        }
    });
}
