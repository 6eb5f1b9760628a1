//! Focus-scoped keybind dispatch
//!
//! Exactly one registration set is live at a time. It is installed when a
//! window gains focus and torn down when any window loses focus or the app
//! quits. A batch that fails part way leaves nothing registered.

use std::collections::HashMap;
use std::sync::Arc;

use neuzos_config::{KeyBind, KeybindEvent};
use neuzos_window::WindowRole;

use crate::accelerator::Accelerator;
use crate::backend::HotkeyBackend;
use crate::error::KeybindError;
use crate::Result;

/// What a fired keybind asks the launcher to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeybindAction {
    /// Toggle fullscreen on the window the binds were registered for
    ToggleFullscreen { role: WindowRole },
    /// Forward a vocabulary event with its args to the focused window's UI
    Forward {
        role: WindowRole,
        event: KeybindEvent,
        args: Vec<String>,
    },
    /// Forward an arbitrary named event; `payload` is the remaining args
    Custom {
        role: WindowRole,
        name: String,
        payload: Vec<String>,
    },
}

pub struct KeybindDispatcher {
    backend: Arc<dyn HotkeyBackend>,
    /// Live binds. Two binds on one accelerator collapse into the later one.
    active: HashMap<Accelerator, KeyBind>,
    scope: Option<WindowRole>,
}

impl KeybindDispatcher {
    pub fn new(backend: Arc<dyn HotkeyBackend>) -> Self {
        Self {
            backend,
            active: HashMap::new(),
            scope: None,
        }
    }

    /// Replace the live registration set with `binds`, scoped to `role`.
    ///
    /// Returns the number of distinct accelerators registered. On any
    /// failure everything is unregistered before the error is returned.
    pub fn register(&mut self, binds: &[KeyBind], role: WindowRole) -> Result<usize> {
        self.unregister_all();

        for bind in binds {
            if let Err(e) = self.register_one(bind) {
                tracing::error!(
                    key = %bind.key,
                    event = %bind.event,
                    "Keybind registration failed, dropping all keybinds: {}",
                    e
                );
                self.unregister_all();
                return Err(e);
            }
        }

        self.scope = Some(role);
        tracing::debug!(role = %role, count = self.active.len(), "Registered keybinds");
        Ok(self.active.len())
    }

    fn register_one(&mut self, bind: &KeyBind) -> Result<()> {
        let accelerator = Accelerator::parse(&bind.key).map_err(|source| {
            KeybindError::Malformed {
                key: bind.key.clone(),
                source,
            }
        })?;

        if let Some(replaced) = self.active.get(&accelerator).map(|b| b.event) {
            tracing::debug!(
                accelerator = %accelerator,
                replaced = %replaced,
                event = %bind.event,
                "Keybind collision, last registration wins"
            );
            self.active.insert(accelerator, bind.clone());
            return Ok(());
        }

        self.backend
            .register(&accelerator)
            .map_err(|reason| KeybindError::Registration {
                key: bind.key.clone(),
                reason,
            })?;
        self.active.insert(accelerator, bind.clone());
        Ok(())
    }

    /// Drop every registration. Safe to call with nothing registered.
    pub fn unregister_all(&mut self) {
        if let Err(e) = self.backend.unregister_all() {
            tracing::warn!("Failed to unregister global hotkeys: {}", e);
        }
        if !self.active.is_empty() {
            tracing::debug!(count = self.active.len(), "Unregistered keybinds");
        }
        self.active.clear();
        self.scope = None;
    }

    /// A window gained focus. Windows that do not take keybinds leave the
    /// set empty.
    pub fn on_focus(&mut self, binds: &[KeyBind], role: WindowRole) -> Result<usize> {
        if !role.receives_keybinds() {
            self.unregister_all();
            return Ok(0);
        }
        self.register(binds, role)
    }

    pub fn on_blur(&mut self) {
        self.unregister_all();
    }

    pub fn on_will_quit(&mut self) {
        self.unregister_all();
    }

    /// Window the live set is scoped to, if any.
    pub fn scope(&self) -> Option<WindowRole> {
        self.scope
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_registered(&self, accelerator: &Accelerator) -> bool {
        self.active.contains_key(accelerator)
    }

    /// Resolve a fired accelerator into an action.
    ///
    /// Binds that carry fewer args than their event needs do nothing.
    pub fn fire(&self, accelerator: &Accelerator) -> Option<KeybindAction> {
        let role = self.scope?;
        let bind = self.active.get(accelerator)?;
        let args = bind.args();

        if args.len() < bind.event.required_args() {
            tracing::debug!(
                accelerator = %accelerator,
                event = %bind.event,
                have = args.len(),
                need = bind.event.required_args(),
                "Keybind missing args, ignoring"
            );
            return None;
        }

        let action = match bind.event {
            KeybindEvent::FullscreenToggle => KeybindAction::ToggleFullscreen { role },
            KeybindEvent::CustomEvent => KeybindAction::Custom {
                role,
                name: args[0].clone(),
                payload: args[1..].to_vec(),
            },
            event => KeybindAction::Forward {
                role,
                event,
                args: args.to_vec(),
            },
        };

        tracing::trace!(accelerator = %accelerator, action = ?action, "Keybind fired");
        Some(action)
    }
}
