//! Command handlers
//!
//! Every inbound bridge command ends here. Handlers either complete, return
//! a non-fatal error for the page, or return a fatal error the shell acts on.

use serde_json::{json, Value};

use neuzos_config::{available_keybind_events, available_switches, Config, ThemeMode};
use neuzos_launch::LaunchPlan;
use neuzos_window::{validate_standalone, StandaloneMode, WindowRole, WindowSize};

use crate::error::CoreError;
use crate::fetch;
use crate::protocol::{Command, UiEvent};
use crate::state::ApplicationState;
use crate::Result;

impl ApplicationState {
    /// Run a decoded command and return its reply payload.
    pub async fn dispatch(&self, command: Command) -> Result<Value> {
        tracing::debug!(command = ?command, "Dispatching command");

        match command {
            Command::MainWindowMinimize => self.minimize(WindowRole::Primary),
            Command::MainWindowMaximize => self.toggle_maximize(WindowRole::Primary),
            Command::MainWindowClose => self.close(WindowRole::Primary),
            Command::MainWindowDestroy => self.destroy(WindowRole::Primary),
            Command::MainWindowReloadConfig => self.reload_config().map(|_| Value::Null),

            Command::SettingsWindowOpen => {
                self.windows.lock().open_settings()?;
                Ok(Value::Null)
            }
            Command::SettingsWindowMinimize => self.minimize(WindowRole::Settings),
            Command::SettingsWindowMaximize => self.toggle_maximize(WindowRole::Settings),
            Command::SettingsWindowClose => self.close(WindowRole::Settings),
            Command::SettingsWindowDestroy => self.destroy(WindowRole::Settings),

            Command::SessionLauncherOpen => {
                self.windows.lock().open_session_launcher()?;
                Ok(Value::Null)
            }
            Command::SessionLauncherMinimize => self.minimize(WindowRole::SessionLauncher),
            Command::SessionLauncherClose => self.close(WindowRole::SessionLauncher),
            Command::SessionLauncherDestroy => {
                self.keybinds.lock().unregister_all();
                self.destroy(WindowRole::SessionLauncher)
            }

            Command::SessionStart {
                session_id,
                layout_id,
            } => {
                self.start_session(&session_id, layout_id)?;
                Ok(Value::Null)
            }
            Command::SessionStop { session_id } => {
                self.stop_session(&session_id);
                Ok(Value::Null)
            }
            Command::SessionRestart { session_id } => {
                self.restart_session(&session_id)?;
                Ok(Value::Null)
            }
            Command::SessionClearCache { session_id } => {
                self.release_session(&session_id)?;
                self.sessions.clear_cache(&session_id).await?;
                Ok(Value::Null)
            }
            Command::SessionClearStorage { session_id } => {
                self.release_session(&session_id)?;
                self.sessions.clear_storage_data(&session_id).await?;
                Ok(Value::Null)
            }
            Command::SessionDestroy { session_id } => {
                self.release_session(&session_id)?;
                self.sessions.destroy_partition(&session_id).await?;
                Ok(Value::Null)
            }
            Command::SessionPopout { session_id, size } => {
                self.popout_session(&session_id, size)?;
                Ok(Value::Null)
            }
            Command::SessionLaunch { session_id, mode } => {
                self.launch_session(&session_id, mode)?;
                Ok(Value::Null)
            }

            Command::TabsAdd { layout_id } => {
                self.require_layout(&layout_id)?;
                self.update_tabs(|tabs| tabs.add(&layout_id));
                Ok(Value::Null)
            }
            Command::TabsSwitch { layout_id } => {
                self.require_layout(&layout_id)?;
                self.update_tabs(|tabs| tabs.switch(&layout_id));
                Ok(Value::Null)
            }
            Command::TabsClose { layout_id } => {
                self.update_tabs(|tabs| tabs.close(&layout_id));
                Ok(Value::Null)
            }
            Command::TabsCloseAll => {
                self.update_tabs(|tabs| tabs.close_all());
                Ok(Value::Null)
            }

            Command::ConfigLoad { force_reload } => {
                let config = self.config.load(force_reload)?;
                Ok(serde_json::to_value(config)?)
            }
            Command::ConfigSave { config } => {
                self.save_config(*config)?;
                Ok(Value::Null)
            }
            Command::ConfigGetAvailableSwitches => Ok(json!(available_switches())),
            Command::ConfigGetAvailableKeybindVocabulary => Ok(json!(available_keybind_events())),

            Command::PreferencesSetThemeMode { theme_mode } => {
                self.set_theme_mode(theme_mode)?;
                Ok(Value::Null)
            }

            Command::FetchNews { url } => Ok(Value::String(fetch::news(&url).await)),
            Command::FetchDefaultUserAgent => Ok(Value::String(fetch::default_user_agent())),
        }
    }

    fn minimize(&self, role: WindowRole) -> Result<Value> {
        self.windows.lock().minimize(role)?;
        Ok(Value::Null)
    }

    fn toggle_maximize(&self, role: WindowRole) -> Result<Value> {
        self.windows.lock().toggle_maximize(role)?;
        Ok(Value::Null)
    }

    /// Ask the runtime to close; guarded roles go through confirmation.
    fn close(&self, role: WindowRole) -> Result<Value> {
        self.windows.lock().close(role)?;
        Ok(Value::Null)
    }

    fn destroy(&self, role: WindowRole) -> Result<Value> {
        self.windows.lock().destroy(role)?;
        Ok(Value::Null)
    }

    // === Sessions ===

    pub fn start_session(&self, session_id: &str, layout_id: Option<String>) -> Result<()> {
        let config = self.config.load(false)?;
        if config.session(session_id).is_none() {
            return Err(CoreError::UnknownSession(session_id.to_string()));
        }

        self.running
            .write()
            .insert(session_id.to_string(), layout_id.clone());
        tracing::info!(session_id = %session_id, layout_id = ?layout_id, "Session started");

        self.broadcast(UiEvent::SessionStarted {
            session_id: session_id.to_string(),
            layout_id,
        });
        Ok(())
    }

    /// Mark a session stopped and tell every window. Idempotent.
    pub fn stop_session(&self, session_id: &str) {
        if self.running.write().remove(session_id).is_some() {
            tracing::info!(session_id = %session_id, "Session stopped");
        }
        self.broadcast(UiEvent::SessionStopped {
            session_id: session_id.to_string(),
        });
    }

    pub fn restart_session(&self, session_id: &str) -> Result<()> {
        let layout_id = self
            .running
            .read()
            .get(session_id)
            .cloned()
            .ok_or_else(|| CoreError::SessionNotRunning(session_id.to_string()))?;

        self.stop_session(session_id);
        self.start_session(session_id, layout_id)
    }

    /// Stop every view reading from a session's partition before it is
    /// cleared or removed.
    fn release_session(&self, session_id: &str) -> Result<()> {
        self.stop_session(session_id);

        let mut windows = self.windows.lock();
        let bound = windows
            .standalone_session()
            .map(|(id, _)| id == session_id)
            .unwrap_or(false);
        if bound {
            tracing::info!(session_id = %session_id, "Closing session window before clearing data");
            windows.destroy(WindowRole::StandaloneSession)?;
        }
        Ok(())
    }

    /// Show a session in this process's standalone window.
    pub fn popout_session(&self, session_id: &str, size: Option<WindowSize>) -> Result<()> {
        let config = self.config.load(false)?;
        validate_standalone(&config, session_id)?;
        let data_dir = self.sessions.partition_dir(session_id)?;

        self.windows.lock().open_standalone(
            &config,
            session_id,
            StandaloneMode::Session,
            data_dir,
            size,
        )?;
        Ok(())
    }

    /// Start a new launcher process dedicated to one session.
    pub fn launch_session(&self, session_id: &str, mode: StandaloneMode) -> Result<()> {
        let config = self.config.load(false)?;
        validate_standalone(&config, session_id)?;

        let plan = LaunchPlan::for_session(mode.into(), session_id).map_err(|e| {
            CoreError::InvalidPayload {
                channel: "session.launch".to_string(),
                reason: e.to_string(),
            }
        })?;

        self.host
            .launch_instance(&plan.to_args())
            .map_err(CoreError::Spawn)?;
        tracing::info!(session_id = %session_id, mode = %plan.mode, "Launched session process");
        Ok(())
    }

    // === Tabs ===

    fn require_layout(&self, layout_id: &str) -> Result<()> {
        let config = self.config.load(false)?;
        if config.layout(layout_id).is_none() {
            return Err(CoreError::UnknownLayout(layout_id.to_string()));
        }
        Ok(())
    }

    fn update_tabs<F>(&self, f: F)
    where
        F: FnOnce(&mut crate::tabs::LayoutTabs),
    {
        let snapshot = {
            let mut tabs = self.tabs.lock();
            f(&mut tabs);
            tabs.snapshot()
        };
        self.emit(WindowRole::Primary, UiEvent::TabsChanged(snapshot));
    }

    // === Config ===

    pub fn save_config(&self, config: Config) -> Result<()> {
        let config = self.config.save(&config)?;
        self.apply_config(&config);
        self.refresh_keybinds(&config)?;
        self.broadcast(UiEvent::ConfigChanged(Box::new(config)));
        Ok(())
    }

    pub fn reload_config(&self) -> Result<Config> {
        let config = self.config.load(true)?;
        self.apply_config(&config);
        self.refresh_keybinds(&config)?;
        self.broadcast(UiEvent::ReloadConfig);
        self.broadcast(UiEvent::ConfigChanged(Box::new(config.clone())));
        Ok(config)
    }

    pub fn set_theme_mode(&self, theme_mode: ThemeMode) -> Result<()> {
        let mut config = self.config.load(false)?;
        config.preferences.theme_mode = theme_mode;
        self.config.save(&config)?;

        self.host.set_theme(theme_mode);
        self.broadcast(UiEvent::ThemeModeChanged(theme_mode));
        tracing::info!(theme_mode = %theme_mode, "Theme mode changed");
        Ok(())
    }
}
