//! Application state
//!
//! One `ApplicationState` lives for the whole process. It owns the config
//! store, the session manager, the window controller and the keybind
//! dispatcher, and turns window-runtime callbacks into transitions on them.
//! Locks are never held across an await.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use neuzos_config::{Config, ConfigStore};
use neuzos_keybind::{Accelerator, HotkeyBackend, KeybindAction, KeybindDispatcher};
use neuzos_launch::{LaunchMode, LaunchPlan};
use neuzos_session::PartitionedSessionManager;
use neuzos_window::{
    validate_standalone, Clock, CloseResponse, WindowController, WindowHost, WindowRole,
};

use crate::error::CoreError;
use crate::protocol::UiEvent;
use crate::tabs::LayoutTabs;
use crate::Result;

pub struct ApplicationState {
    pub(crate) config: ConfigStore,
    pub(crate) sessions: PartitionedSessionManager,
    pub(crate) host: Arc<dyn WindowHost>,
    pub(crate) windows: Arc<Mutex<WindowController>>,
    pub(crate) keybinds: Arc<Mutex<KeybindDispatcher>>,
    pub(crate) tabs: Arc<Mutex<LayoutTabs>>,
    /// Running sessions and the layout each was started from
    pub(crate) running: Arc<RwLock<HashMap<String, Option<String>>>>,
}

impl ApplicationState {
    pub fn new(
        config: ConfigStore,
        sessions: PartitionedSessionManager,
        host: Arc<dyn WindowHost>,
        hotkeys: Arc<dyn HotkeyBackend>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let windows = WindowController::new(Arc::clone(&host), clock);
        Self {
            config,
            sessions,
            host,
            windows: Arc::new(Mutex::new(windows)),
            keybinds: Arc::new(Mutex::new(KeybindDispatcher::new(hotkeys))),
            tabs: Arc::new(Mutex::new(LayoutTabs::new())),
            running: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config_store(&self) -> &ConfigStore {
        &self.config
    }

    pub fn session_manager(&self) -> &PartitionedSessionManager {
        &self.sessions
    }

    pub fn config_path(&self) -> PathBuf {
        self.config.path().to_path_buf()
    }

    pub fn running_sessions(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.running.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn is_running(&self, session_id: &str) -> bool {
        self.running.read().contains_key(session_id)
    }

    pub fn window_role(&self, label: &str) -> Option<WindowRole> {
        self.windows.lock().role_of(label)
    }

    /// Load the config, resolve the launch mode and open the first window.
    ///
    /// Every error returned here is fatal.
    pub fn startup<I, S>(&self, args: I) -> Result<LaunchPlan>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let config = self.config.load(false).map_err(CoreError::ConfigLoad)?;
        self.apply_config(&config);

        let plan = neuzos_launch::resolve(args, &config)?;

        match plan.standalone() {
            Some((mode, session_id)) => {
                validate_standalone(&config, session_id).map_err(CoreError::InvalidStandalone)?;
                let data_dir = self
                    .sessions
                    .partition_dir(session_id)
                    .map_err(CoreError::StandalonePartition)?;
                self.windows
                    .lock()
                    .open_standalone(&config, session_id, mode, data_dir, None)?;
            }
            None if plan.mode == LaunchMode::SessionLauncher => {
                self.windows.lock().open_session_launcher()?;
            }
            None => {
                self.seed_tabs(&config);
                self.windows.lock().open_primary()?;
            }
        }

        tracing::info!(mode = %plan.mode, "NeuzOS started");
        Ok(plan)
    }

    /// Open the configured default layouts that still exist.
    fn seed_tabs(&self, config: &Config) {
        let mut tabs = self.tabs.lock();
        for layout_id in &config.launch_defaults.default_layouts {
            if config.layout(layout_id).is_some() {
                tabs.add(layout_id);
            } else {
                tracing::debug!(layout_id = %layout_id, "Skipping missing default layout");
            }
        }
    }

    /// Push config values that live outside the document into the runtime.
    pub(crate) fn apply_config(&self, config: &Config) {
        self.windows
            .lock()
            .set_browser_args(browser_args(&config.chromium_switches));
        self.host.set_theme(config.preferences.theme_mode);
    }

    pub(crate) fn emit(&self, role: WindowRole, event: UiEvent) {
        self.windows.lock().emit(role, event.name(), event.payload());
    }

    pub(crate) fn broadcast(&self, event: UiEvent) {
        self.windows.lock().broadcast(event.name(), event.payload());
    }

    fn keybind_error(&self, source: neuzos_keybind::KeybindError) -> CoreError {
        CoreError::KeybindRegistration {
            config_path: self.config_path(),
            source,
        }
    }

    /// Re-register the live keybind set from `config` if one is active.
    pub(crate) fn refresh_keybinds(&self, config: &Config) -> Result<()> {
        let mut keybinds = self.keybinds.lock();
        if let Some(role) = keybinds.scope() {
            keybinds
                .register(&config.key_binds, role)
                .map_err(|source| self.keybind_error(source))?;
        }
        Ok(())
    }

    // === Window runtime callbacks ===

    /// A window gained input focus; its keybinds go live.
    pub fn on_window_focus(&self, label: &str) -> Result<()> {
        let Some(role) = self.window_role(label) else {
            return Ok(());
        };
        let config = self.config.load(false)?;

        self.keybinds
            .lock()
            .on_focus(&config.key_binds, role)
            .map_err(|source| self.keybind_error(source))?;
        Ok(())
    }

    /// Any window losing focus drops every keybind.
    pub fn on_window_blur(&self, _label: &str) {
        self.keybinds.lock().on_blur();
    }

    pub fn on_window_ready(&self, label: &str) -> Result<()> {
        self.windows.lock().on_ready(label)?;

        if self.window_role(label) == Some(WindowRole::Primary) {
            let snapshot = self.tabs.lock().snapshot();
            self.emit(WindowRole::Primary, UiEvent::TabsChanged(snapshot));
        }
        Ok(())
    }

    pub fn on_close_requested(&self, label: &str) -> CloseResponse {
        let (role, response) = {
            let mut windows = self.windows.lock();
            let role = windows.role_of(label);
            (role, windows.on_close_requested(label))
        };

        // The launcher can be the only window, so nothing else would blur
        if response == CloseResponse::Proceed && role == Some(WindowRole::SessionLauncher) {
            self.keybinds.lock().unregister_all();
        }
        response
    }

    pub fn on_window_resized(&self, label: &str, width: u32, height: u32) {
        let session = {
            let windows = self.windows.lock();
            match windows.role_of(label) {
                Some(WindowRole::StandaloneSession) => windows.standalone_session(),
                _ => None,
            }
        };

        if let Some((session_id, _)) = session {
            self.emit(
                WindowRole::Primary,
                UiEvent::SessionResized {
                    session_id,
                    width,
                    height,
                },
            );
        }
    }

    pub fn on_fullscreen_changed(&self, label: &str, fullscreen: bool) -> Result<()> {
        self.windows
            .lock()
            .on_fullscreen_changed(label, fullscreen)?;
        Ok(())
    }

    pub fn on_window_destroyed(&self, label: &str) {
        let Some(role) = self.windows.lock().on_destroyed(label) else {
            return;
        };

        let mut keybinds = self.keybinds.lock();
        if keybinds.scope() == Some(role) {
            keybinds.unregister_all();
        }
    }

    /// The app is about to quit.
    pub fn on_will_quit(&self) {
        self.keybinds.lock().on_will_quit();
    }

    /// A registered global hotkey fired.
    pub fn on_hotkey(&self, accelerator: &Accelerator) -> Result<()> {
        let Some(action) = self.keybinds.lock().fire(accelerator) else {
            return Ok(());
        };

        match action {
            KeybindAction::ToggleFullscreen { role } => {
                self.windows.lock().toggle_fullscreen(role)?;
            }
            KeybindAction::Forward { role, event, args } => {
                self.emit(role, UiEvent::Keybind { event, args });
            }
            KeybindAction::Custom {
                role,
                name,
                payload,
            } => {
                self.emit(role, UiEvent::Custom { name, payload });
            }
        }
        Ok(())
    }
}

impl Clone for ApplicationState {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            sessions: self.sessions.clone(),
            host: Arc::clone(&self.host),
            windows: Arc::clone(&self.windows),
            keybinds: Arc::clone(&self.keybinds),
            tabs: Arc::clone(&self.tabs),
            running: Arc::clone(&self.running),
        }
    }
}

/// Switches from the document as runtime arguments, `--` prefixed.
pub fn browser_args(switches: &[String]) -> Vec<String> {
    switches
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with("--") {
                s.to_string()
            } else {
                format!("--{}", s)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{browser_session, config, fixture, fixture_from_disk, layout, session};
    use neuzos_config::{KeyBind, KeybindEvent};
    use neuzos_launch::LaunchError;
    use neuzos_window::{StandaloneMode, WindowError};
    use std::time::Duration;

    fn accel(s: &str) -> Accelerator {
        Accelerator::parse(s).unwrap()
    }

    #[test]
    fn test_normal_startup_opens_primary_once() {
        let fx = fixture(config(vec![session("s1")], vec![]));
        let plan = fx.state.startup(["neuzos"]).unwrap();

        assert_eq!(plan.mode, LaunchMode::Normal);
        assert_eq!(fx.host.created_labels(), vec!["main"]);

        fx.state.windows.lock().open_primary().unwrap();
        assert_eq!(fx.host.created_labels(), vec!["main"]);
        assert_eq!(fx.host.calls_for("focus"), vec!["main"]);
    }

    #[test]
    fn test_launcher_default_from_config() {
        let mut cfg = config(vec![], vec![]);
        cfg.launch_defaults.default_launch_mode = "session_launcher".into();
        let fx = fixture(cfg);

        fx.state.startup(Vec::<String>::new()).unwrap();
        assert_eq!(fx.host.created_labels(), vec!["session-launcher"]);
    }

    #[test]
    fn test_browser_partition_session_is_fatal() {
        let fx = fixture(config(vec![browser_session("b1")], vec![]));

        let err = fx
            .state
            .startup(["--mode=focus", "--session_id=b1"])
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            CoreError::InvalidStandalone(WindowError::SharedPartition(_))
        ));
        assert!(fx.host.created_labels().is_empty());
    }

    #[test]
    fn test_unknown_session_is_fatal() {
        let fx = fixture(config(vec![session("s1")], vec![]));
        let err = fx
            .state
            .startup(["--mode=session", "--session_id=ghost"])
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(fx.host.created_labels().is_empty());
    }

    #[test]
    fn test_missing_session_id_is_fatal() {
        let fx = fixture(config(vec![session("s1")], vec![]));
        let err = fx.state.startup(["--mode=focus_fullscreen"]).unwrap_err();
        assert!(matches!(err, CoreError::Launch(LaunchError::MissingSessionId(_))));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_startup_applies_switches_and_theme() {
        let mut cfg = config(vec![], vec![]);
        cfg.chromium_switches = vec!["disable-gpu".into(), "--use-angle=d3d11".into()];
        cfg.preferences.theme_mode = neuzos_config::ThemeMode::Dark;
        let fx = fixture(cfg);

        fx.state.startup(["neuzos"]).unwrap();
        assert_eq!(
            fx.host.created_specs()[0].browser_args,
            vec!["--disable-gpu", "--use-angle=d3d11"]
        );
        assert_eq!(fx.host.theme(), Some(neuzos_config::ThemeMode::Dark));
    }

    #[test]
    fn test_startup_merges_and_sanitizes_document_on_disk() {
        let fx = fixture_from_disk(
            r#"{
                "chromiumSwitches": ["disable-gpu", "--force-dark-mode"],
                "preferences": { "themeMode": "dark" },
                "keyBinds": [
                    { "key": "", "event": "layout_swap" },
                    { "key": "F9", "event": "not_an_event" },
                    { "key": "F11", "event": "fullscreen_toggle" }
                ],
                "launcherNotes": "kept"
            }"#,
        );

        fx.state.startup(["neuzos"]).unwrap();
        assert_eq!(
            fx.host.created_specs()[0].browser_args,
            vec!["--disable-gpu"]
        );
        assert_eq!(fx.host.theme(), Some(neuzos_config::ThemeMode::Dark));

        fx.state.on_window_focus("main").unwrap();
        assert_eq!(fx.hotkeys.registered(), vec!["F11"]);

        let on_disk: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(fx.state.config_path()).unwrap())
                .unwrap();
        assert_eq!(on_disk["launcherNotes"], "kept");
        assert!(on_disk["launchDefaults"].is_object());
        assert_eq!(on_disk["keyBinds"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_default_layouts_open_as_tabs() {
        let mut cfg = config(vec![session("s1")], vec![]);
        cfg.layouts = vec![layout("l1", &["s1"])];
        cfg.launch_defaults.default_layouts = vec!["l1".into(), "gone".into()];
        let fx = fixture(cfg);

        fx.state.startup(["neuzos"]).unwrap();
        fx.state.on_window_ready("main").unwrap();

        let pushed = fx.host.emitted_to("main", "tabs-changed");
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0]["open"], serde_json::json!(["l1"]));
    }

    #[test]
    fn test_focus_mode_scenario() {
        let fx = fixture(config(
            vec![session("s1")],
            vec![KeyBind::new("F11", KeybindEvent::FullscreenToggle)],
        ));

        let plan = fx
            .state
            .startup(["--mode=focus", "--session_id=s1"])
            .unwrap();
        assert_eq!(plan.standalone(), Some((StandaloneMode::Focus, "s1")));
        assert_eq!(fx.host.created_labels(), vec!["session"]);
        let spec = &fx.host.created_specs()[0];
        assert!(spec.data_dir.as_ref().unwrap().ends_with("Partitions/s1"));

        fx.state.on_window_ready("session").unwrap();
        fx.state.on_window_focus("session").unwrap();
        assert_eq!(fx.hotkeys.registered(), vec!["F11"]);

        // F11 is registered but swallowed in focus mode
        fx.state.on_hotkey(&accel("F11")).unwrap();
        assert!(!fx.host.is_fullscreen("session"));

        // Two rapid attempts are cancelled
        assert_eq!(fx.state.on_close_requested("session"), CloseResponse::Prevent);
        fx.clock.advance(Duration::from_millis(500));
        assert_eq!(fx.state.on_close_requested("session"), CloseResponse::Prevent);

        // After the debounce lapses, two more are needed before one goes through
        fx.clock.advance(Duration::from_millis(2500));
        assert_eq!(fx.state.on_close_requested("session"), CloseResponse::Prevent);
        assert_eq!(fx.state.on_close_requested("session"), CloseResponse::Prevent);
        assert_eq!(fx.state.on_close_requested("session"), CloseResponse::Proceed);
    }

    #[test]
    fn test_focus_fullscreen_scenario() {
        let fx = fixture(config(
            vec![session("s1")],
            vec![KeyBind::new("F11", KeybindEvent::FullscreenToggle)],
        ));
        fx.state
            .startup(["--mode=focus_fullscreen", "--session_id=s1"])
            .unwrap();
        fx.state.on_window_ready("session").unwrap();
        assert!(fx.host.is_fullscreen("session"));

        fx.state.on_window_focus("session").unwrap();
        fx.state.on_hotkey(&accel("F11")).unwrap();
        assert!(fx.host.is_fullscreen("session"));

        fx.host.set_fullscreen("session", false).unwrap();
        fx.state.on_fullscreen_changed("session", false).unwrap();
        assert!(fx.host.is_fullscreen("session"));
    }

    #[test]
    fn test_primary_fullscreen_toggle() {
        let fx = fixture(config(
            vec![],
            vec![KeyBind::new("F11", KeybindEvent::FullscreenToggle)],
        ));
        fx.state.startup(["neuzos"]).unwrap();
        fx.state.on_window_focus("main").unwrap();

        fx.state.on_hotkey(&accel("F11")).unwrap();
        assert!(fx.host.is_fullscreen("main"));
    }

    #[test]
    fn test_bad_accelerator_on_focus_is_fatal_and_atomic() {
        let fx = fixture(config(
            vec![],
            vec![
                KeyBind::new("F11", KeybindEvent::FullscreenToggle),
                KeyBind::new("ctrl+++", KeybindEvent::LayoutSwap),
            ],
        ));
        fx.state.startup(["neuzos"]).unwrap();

        let err = fx.state.on_window_focus("main").unwrap_err();
        assert!(err.is_fatal());
        match err {
            CoreError::KeybindRegistration { config_path, .. } => {
                assert!(config_path.ends_with("config.json"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(fx.hotkeys.registered().is_empty());
    }

    #[test]
    fn test_blur_and_settings_focus_drop_keybinds() {
        let fx = fixture(config(
            vec![],
            vec![KeyBind::new("F11", KeybindEvent::FullscreenToggle)],
        ));
        fx.state.startup(["neuzos"]).unwrap();
        fx.state.windows.lock().open_settings().unwrap();

        fx.state.on_window_focus("main").unwrap();
        assert_eq!(fx.hotkeys.registered().len(), 1);

        fx.state.on_window_blur("main");
        assert!(fx.hotkeys.registered().is_empty());

        fx.state.on_window_focus("settings").unwrap();
        assert!(fx.hotkeys.registered().is_empty());
    }

    #[test]
    fn test_launcher_close_drops_keybinds() {
        let mut cfg = config(
            vec![],
            vec![KeyBind::new("F11", KeybindEvent::FullscreenToggle)],
        );
        cfg.launch_defaults.default_launch_mode = "session_launcher".into();
        let fx = fixture(cfg);
        fx.state.startup(["neuzos"]).unwrap();
        fx.state.on_window_focus("session-launcher").unwrap();
        assert_eq!(fx.hotkeys.registered().len(), 1);

        assert_eq!(
            fx.state.on_close_requested("session-launcher"),
            CloseResponse::Proceed
        );
        assert!(fx.hotkeys.registered().is_empty());
    }

    #[test]
    fn test_forwarded_keybind_reaches_focused_window() {
        let fx = fixture(config(
            vec![],
            vec![KeyBind::new("Alt+1", KeybindEvent::LayoutSwitch).with_args(vec!["l1".into()])],
        ));
        fx.state.startup(["neuzos"]).unwrap();
        fx.state.on_window_focus("main").unwrap();

        fx.state.on_hotkey(&accel("alt+1")).unwrap();
        assert_eq!(
            fx.host.emitted_to("main", "layout_switch"),
            vec![serde_json::json!({ "args": ["l1"] })]
        );
    }

    #[test]
    fn test_will_quit_unregisters() {
        let fx = fixture(config(
            vec![],
            vec![KeyBind::new("F11", KeybindEvent::FullscreenToggle)],
        ));
        fx.state.startup(["neuzos"]).unwrap();
        fx.state.on_window_focus("main").unwrap();
        fx.state.on_will_quit();
        assert!(fx.hotkeys.registered().is_empty());
    }

    #[test]
    fn test_destroyed_window_releases_role() {
        let fx = fixture(config(vec![], vec![]));
        fx.state.startup(["neuzos"]).unwrap();
        fx.state.on_window_destroyed("main");
        assert_eq!(fx.state.window_role("main"), None);
    }

    #[test]
    fn test_browser_args_prefix() {
        assert_eq!(
            browser_args(&["a".into(), " --b=1 ".into(), "".into()]),
            vec!["--a", "--b=1"]
        );
    }
}
