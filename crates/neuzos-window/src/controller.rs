//! Window controller
//!
//! Holds one slot per role. A slot exists from the create request until the
//! host reports the window destroyed; no slot means the role is absent.

use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use neuzos_config::{Config, Session};

use crate::close_guard::{Clock, CloseDecision, CloseGuard};
use crate::error::WindowError;
use crate::geometry::WindowSize;
use crate::host::WindowHost;
use crate::role::{StandaloneMode, WindowRole};
use crate::window_spec::WindowSpec;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Creating,
    Visible,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A new window was built
    Created,
    /// A live window already existed and was focused instead
    Focused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseResponse {
    /// Keep the window open
    Prevent,
    /// Let the runtime close it
    Proceed,
}

#[derive(Debug, Clone)]
struct WindowSlot {
    label: String,
    state: WindowState,
    standalone: Option<StandaloneBinding>,
}

#[derive(Debug, Clone)]
struct StandaloneBinding {
    session_id: String,
    mode: StandaloneMode,
}

/// Check that a session may be opened in its own window.
///
/// The session must exist and must not use the shared browser partition.
pub fn validate_standalone<'a>(config: &'a Config, session_id: &str) -> Result<&'a Session> {
    let session = config
        .session(session_id)
        .ok_or_else(|| WindowError::UnknownSession(session_id.to_string()))?;

    if session.uses_browser_partition() {
        return Err(WindowError::SharedPartition(session_id.to_string()));
    }

    Ok(session)
}

pub struct WindowController {
    host: Arc<dyn WindowHost>,
    clock: Arc<dyn Clock>,
    slots: HashMap<WindowRole, WindowSlot>,
    /// Shared by every guarded window
    close_guard: CloseGuard,
    browser_args: Vec<String>,
}

impl WindowController {
    pub fn new(host: Arc<dyn WindowHost>, clock: Arc<dyn Clock>) -> Self {
        Self {
            host,
            clock,
            slots: HashMap::new(),
            close_guard: CloseGuard::new(),
            browser_args: Vec::new(),
        }
    }

    pub fn host(&self) -> &Arc<dyn WindowHost> {
        &self.host
    }

    /// Switches passed to windows created from now on.
    pub fn set_browser_args(&mut self, args: Vec<String>) {
        self.browser_args = args;
    }

    pub fn open_primary(&mut self) -> Result<OpenOutcome> {
        let spec = WindowSpec::primary(self.host.work_area());
        self.open(spec, None)
    }

    pub fn open_settings(&mut self) -> Result<OpenOutcome> {
        self.open(WindowSpec::settings(), None)
    }

    pub fn open_session_launcher(&mut self) -> Result<OpenOutcome> {
        self.open(WindowSpec::session_launcher(), None)
    }

    /// Open the standalone window for `session_id`.
    ///
    /// Validation runs before anything is created. When a standalone window
    /// is already live it is focused, whatever session it hosts. `size`
    /// overrides the work-area derived geometry.
    pub fn open_standalone(
        &mut self,
        config: &Config,
        session_id: &str,
        mode: StandaloneMode,
        data_dir: PathBuf,
        size: Option<WindowSize>,
    ) -> Result<OpenOutcome> {
        let session = validate_standalone(config, session_id)?;
        let mut spec = WindowSpec::standalone(session, mode, data_dir, self.host.work_area());
        if let Some(size) = size {
            spec = spec.with_size(size);
        }
        let binding = StandaloneBinding {
            session_id: session.id.clone(),
            mode,
        };
        self.open(spec, Some(binding))
    }

    fn open(&mut self, spec: WindowSpec, standalone: Option<StandaloneBinding>) -> Result<OpenOutcome> {
        let role = spec.role;

        if let Some(slot) = self.slots.get(&role) {
            if self.host.is_alive(&slot.label) {
                tracing::debug!(role = %role, "Window already open, focusing");
                self.host
                    .focus(&slot.label)
                    .map_err(|reason| WindowError::Host { role, reason })?;
                return Ok(OpenOutcome::Focused);
            }
            tracing::debug!(role = %role, "Dropping stale window handle");
            self.slots.remove(&role);
        }

        let spec = spec.with_browser_args(self.browser_args.clone());
        self.host
            .create(&spec)
            .map_err(|reason| WindowError::Host { role, reason })?;

        self.slots.insert(
            role,
            WindowSlot {
                label: spec.label.clone(),
                state: WindowState::Creating,
                standalone,
            },
        );

        tracing::info!(role = %role, label = %spec.label, "Created window");
        Ok(OpenOutcome::Created)
    }

    pub fn role_of(&self, label: &str) -> Option<WindowRole> {
        self.slots
            .iter()
            .find(|(_, slot)| slot.label == label)
            .map(|(role, _)| *role)
    }

    pub fn state(&self, role: WindowRole) -> Option<WindowState> {
        self.slots.get(&role).map(|slot| slot.state)
    }

    pub fn is_open(&self, role: WindowRole) -> bool {
        self.slots.contains_key(&role)
    }

    /// Session and mode of the standalone window, if one is open.
    pub fn standalone_session(&self) -> Option<(String, StandaloneMode)> {
        self.slots
            .get(&WindowRole::StandaloneSession)
            .and_then(|slot| slot.standalone.as_ref())
            .map(|b| (b.session_id.clone(), b.mode))
    }

    /// Host signal: the page has rendered and the window can be shown.
    pub fn on_ready(&mut self, label: &str) -> Result<()> {
        let Some(role) = self.role_of(label) else {
            return Ok(());
        };
        let Some(slot) = self.slots.get_mut(&role) else {
            return Ok(());
        };
        if slot.state != WindowState::Creating {
            return Ok(());
        }
        slot.state = WindowState::Visible;
        let pins_fullscreen = slot
            .standalone
            .as_ref()
            .map(|b| b.mode.pins_fullscreen())
            .unwrap_or(false);

        let host_err = |reason| WindowError::Host { role, reason };
        self.host.show(label).map_err(host_err)?;
        if pins_fullscreen {
            self.host.set_fullscreen(label, true).map_err(host_err)?;
        }
        Ok(())
    }

    /// Host signal: fullscreen state of a window changed.
    ///
    /// A `focus_fullscreen` window leaving fullscreen is a fault and is put
    /// back. Returns true when a correction was applied.
    pub fn on_fullscreen_changed(&mut self, label: &str, fullscreen: bool) -> Result<bool> {
        if fullscreen {
            return Ok(false);
        }
        let Some(role) = self.role_of(label) else {
            return Ok(false);
        };
        let pinned = self
            .slots
            .get(&role)
            .and_then(|slot| slot.standalone.as_ref())
            .map(|b| b.mode.pins_fullscreen())
            .unwrap_or(false);
        if !pinned {
            return Ok(false);
        }

        tracing::warn!(label = %label, "Window left pinned fullscreen, restoring");
        self.host
            .set_fullscreen(label, true)
            .map_err(|reason| WindowError::Host { role, reason })?;
        Ok(true)
    }

    /// Toggle fullscreen on a role's window. Returns the new state, or
    /// `None` when the window's mode swallows the toggle.
    pub fn toggle_fullscreen(&mut self, role: WindowRole) -> Result<Option<bool>> {
        let slot = self.slots.get(&role).ok_or(WindowError::NotOpen(role))?;
        if let Some(binding) = &slot.standalone {
            if !binding.mode.allows_fullscreen_toggle() {
                tracing::debug!(mode = ?binding.mode, "Fullscreen toggle swallowed");
                return Ok(None);
            }
        }

        let next = !self.host.is_fullscreen(&slot.label);
        self.host
            .set_fullscreen(&slot.label, next)
            .map_err(|reason| WindowError::Host { role, reason })?;
        Ok(Some(next))
    }

    /// Host signal: the user or the page asked to close a window.
    pub fn on_close_requested(&mut self, label: &str) -> CloseResponse {
        let Some(role) = self.role_of(label) else {
            return CloseResponse::Proceed;
        };

        if role.close_guarded() {
            let now = self.clock.now();
            if self.close_guard.attempt(now) == CloseDecision::Cancel {
                return CloseResponse::Prevent;
            }
        }

        if let Some(slot) = self.slots.get_mut(&role) {
            slot.state = WindowState::Closing;
        }
        tracing::info!(role = %role, "Closing window");
        CloseResponse::Proceed
    }

    /// Host signal: a window is gone. Returns the role it held.
    pub fn on_destroyed(&mut self, label: &str) -> Option<WindowRole> {
        let role = self.role_of(label)?;
        self.slots.remove(&role);
        tracing::info!(role = %role, "Window destroyed");
        Some(role)
    }

    /// Ask the host to close a role's window through the guarded path.
    pub fn close(&mut self, role: WindowRole) -> Result<()> {
        let label = self.label_for(role)?;
        self.host
            .close(&label)
            .map_err(|reason| WindowError::Host { role, reason })
    }

    /// Tear a window down immediately, bypassing the close guard.
    pub fn destroy(&mut self, role: WindowRole) -> Result<()> {
        let label = self.label_for(role)?;
        self.slots.remove(&role);
        self.host
            .destroy(&label)
            .map_err(|reason| WindowError::Host { role, reason })?;
        tracing::info!(role = %role, "Destroyed window");
        Ok(())
    }

    pub fn minimize(&mut self, role: WindowRole) -> Result<()> {
        let label = self.label_for(role)?;
        self.host
            .minimize(&label)
            .map_err(|reason| WindowError::Host { role, reason })
    }

    pub fn toggle_maximize(&mut self, role: WindowRole) -> Result<()> {
        let label = self.label_for(role)?;
        self.host
            .toggle_maximize(&label)
            .map_err(|reason| WindowError::Host { role, reason })
    }

    /// Push an event to one role's window. A missing window is not an error.
    pub fn emit(&self, role: WindowRole, event: &str, payload: Value) {
        let Some(slot) = self.slots.get(&role) else {
            tracing::debug!(role = %role, event, "No window to receive event");
            return;
        };
        if let Err(e) = self.host.emit(&slot.label, event, payload) {
            tracing::warn!(role = %role, event, "Failed to emit event: {}", e);
        }
    }

    /// Push an event to every open window.
    pub fn broadcast(&self, event: &str, payload: Value) {
        for (role, slot) in &self.slots {
            if let Err(e) = self.host.emit(&slot.label, event, payload.clone()) {
                tracing::warn!(role = %role, event, "Failed to emit event: {}", e);
            }
        }
    }

    fn label_for(&self, role: WindowRole) -> Result<String> {
        self.slots
            .get(&role)
            .map(|slot| slot.label.clone())
            .ok_or(WindowError::NotOpen(role))
    }
}
