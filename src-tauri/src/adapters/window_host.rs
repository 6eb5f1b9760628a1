//! Tauri-backed window host

use serde_json::Value;
use tauri::webview::{NewWindowResponse, PageLoadEvent};
use tauri::{AppHandle, Emitter, Manager, Theme, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use tauri_plugin_opener::OpenerExt;

use neuzos_core::config::ThemeMode;
use neuzos_core::window::{WindowContent, WindowHost, WindowSpec, WorkArea};

use crate::pump::{Signal, SignalPump};

pub struct TauriWindowHost {
    app: AppHandle,
}

impl TauriWindowHost {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }

    fn window(&self, label: &str) -> Result<WebviewWindow, String> {
        self.app
            .get_webview_window(label)
            .ok_or_else(|| format!("No window labelled {}", label))
    }
}

/// Hand a link the game tried to open in a new window to the OS.
fn open_external(app: &AppHandle, url: &url::Url) {
    if !matches!(url.scheme(), "http" | "https") {
        tracing::warn!(url = %url, "Refusing to open non-web link");
        return;
    }
    if let Err(e) = app.opener().open_url(url.as_str(), None::<&str>) {
        tracing::warn!(url = %url, "Failed to open external link: {}", e);
    }
}

fn platform_theme(mode: ThemeMode) -> Option<Theme> {
    match mode {
        ThemeMode::Dark => Some(Theme::Dark),
        ThemeMode::Light => Some(Theme::Light),
        ThemeMode::System => None,
    }
}

impl WindowHost for TauriWindowHost {
    fn create(&self, spec: &WindowSpec) -> Result<(), String> {
        let url = match &spec.content {
            WindowContent::App(page) => WebviewUrl::App(page.into()),
            WindowContent::External(url) => {
                WebviewUrl::External(url.parse().map_err(|e| format!("{}: {}", url, e))?)
            }
        };

        let mut builder = WebviewWindowBuilder::new(&self.app, &spec.label, url)
            .title(&spec.title)
            .inner_size(spec.size.width as f64, spec.size.height as f64)
            .resizable(spec.resizable)
            .fullscreen(spec.fullscreen)
            .visible(false)
            .center();

        if let Some(min) = spec.min_size {
            builder = builder.min_inner_size(min.width as f64, min.height as f64);
        }
        if let Some(dir) = &spec.data_dir {
            builder = builder.data_directory(dir.clone());
        }
        if !spec.browser_args.is_empty() {
            builder = builder.additional_browser_args(&spec.browser_args.join(" "));
        }
        if !spec.bridge {
            // Game pages only get the opener for outbound links
            let app = self.app.clone();
            builder = builder.on_new_window(move |url, _features| {
                open_external(&app, &url);
                NewWindowResponse::Deny
            });
        }

        let app = self.app.clone();
        builder = builder.on_page_load(move |window, payload| {
            if payload.event() != PageLoadEvent::Finished {
                return;
            }
            if let Some(pump) = app.try_state::<SignalPump>() {
                pump.send(Signal::Ready(window.label().to_string()));
            }
        });

        builder.build().map_err(|e| e.to_string())?;
        Ok(())
    }

    fn is_alive(&self, label: &str) -> bool {
        self.app.get_webview_window(label).is_some()
    }

    fn show(&self, label: &str) -> Result<(), String> {
        self.window(label)?.show().map_err(|e| e.to_string())
    }

    fn focus(&self, label: &str) -> Result<(), String> {
        let window = self.window(label)?;
        if window.is_minimized().unwrap_or(false) {
            window.unminimize().map_err(|e| e.to_string())?;
        }
        window.set_focus().map_err(|e| e.to_string())
    }

    fn close(&self, label: &str) -> Result<(), String> {
        self.window(label)?.close().map_err(|e| e.to_string())
    }

    fn destroy(&self, label: &str) -> Result<(), String> {
        self.window(label)?.destroy().map_err(|e| e.to_string())
    }

    fn minimize(&self, label: &str) -> Result<(), String> {
        self.window(label)?.minimize().map_err(|e| e.to_string())
    }

    fn toggle_maximize(&self, label: &str) -> Result<(), String> {
        let window = self.window(label)?;
        let result = if window.is_maximized().unwrap_or(false) {
            window.unmaximize()
        } else {
            window.maximize()
        };
        result.map_err(|e| e.to_string())
    }

    fn is_fullscreen(&self, label: &str) -> bool {
        self.window(label)
            .and_then(|w| w.is_fullscreen().map_err(|e| e.to_string()))
            .unwrap_or(false)
    }

    fn set_fullscreen(&self, label: &str, fullscreen: bool) -> Result<(), String> {
        self.window(label)?
            .set_fullscreen(fullscreen)
            .map_err(|e| e.to_string())
    }

    fn emit(&self, label: &str, event: &str, payload: Value) -> Result<(), String> {
        self.app
            .emit_to(label, event, payload)
            .map_err(|e| e.to_string())
    }

    fn set_theme(&self, mode: ThemeMode) {
        self.app.set_theme(platform_theme(mode));
    }

    fn work_area(&self) -> Option<WorkArea> {
        let monitor = self.app.primary_monitor().ok().flatten()?;
        let logical = monitor.work_area().size.to_logical::<f64>(monitor.scale_factor());
        Some(WorkArea {
            width: logical.width as u32,
            height: logical.height as u32,
        })
    }

    fn launch_instance(&self, args: &[String]) -> Result<(), String> {
        let exe = std::env::current_exe().map_err(|e| e.to_string())?;
        std::process::Command::new(&exe)
            .args(args)
            .spawn()
            .map_err(|e| format!("{}: {}", exe.display(), e))?;
        Ok(())
    }
}
