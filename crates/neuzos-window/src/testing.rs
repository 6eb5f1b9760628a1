//! Recording window host for tests.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use neuzos_config::ThemeMode;

use crate::geometry::WorkArea;
use crate::host::WindowHost;
use crate::window_spec::WindowSpec;

#[derive(Default)]
struct HostState {
    specs: Vec<WindowSpec>,
    alive: HashSet<String>,
    fullscreen: HashMap<String, bool>,
    calls: Vec<(String, String)>,
    emitted: Vec<(String, String, Value)>,
    launched: Vec<Vec<String>>,
    theme: Option<ThemeMode>,
    work_area: Option<WorkArea>,
    failing: HashSet<String>,
}

/// Keeps windows as labels and records every call made on them.
#[derive(Default)]
pub struct RecordingHost {
    state: Mutex<HostState>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_work_area(work_area: WorkArea) -> Self {
        let host = Self::default();
        host.state.lock().work_area = Some(work_area);
        host
    }

    pub fn created_specs(&self) -> Vec<WindowSpec> {
        self.state.lock().specs.clone()
    }

    pub fn created_labels(&self) -> Vec<String> {
        self.state
            .lock()
            .specs
            .iter()
            .map(|s| s.label.clone())
            .collect()
    }

    /// Labels passed to every call of `method`, in order.
    pub fn calls_for(&self, method: &str) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, label)| label.clone())
            .collect()
    }

    pub fn emitted(&self) -> Vec<(String, String, Value)> {
        self.state.lock().emitted.clone()
    }

    /// Events named `event` pushed to `label`.
    pub fn emitted_to(&self, label: &str, event: &str) -> Vec<Value> {
        self.state
            .lock()
            .emitted
            .iter()
            .filter(|(l, e, _)| l == label && e == event)
            .map(|(_, _, payload)| payload.clone())
            .collect()
    }

    pub fn launched(&self) -> Vec<Vec<String>> {
        self.state.lock().launched.clone()
    }

    pub fn theme(&self) -> Option<ThemeMode> {
        self.state.lock().theme
    }

    /// Simulate the runtime dropping a window behind the controller's back.
    pub fn kill(&self, label: &str) {
        self.state.lock().alive.remove(label);
    }

    /// Make every call that targets `label` fail.
    pub fn fail_on(&self, label: &str) {
        self.state.lock().failing.insert(label.to_string());
    }

    fn record(&self, method: &str, label: &str) -> Result<(), String> {
        let mut state = self.state.lock();
        state.calls.push((method.to_string(), label.to_string()));
        if state.failing.contains(label) {
            return Err(format!("{} failed for {}", method, label));
        }
        Ok(())
    }
}

impl WindowHost for RecordingHost {
    fn create(&self, spec: &WindowSpec) -> Result<(), String> {
        self.record("create", &spec.label)?;
        let mut state = self.state.lock();
        state.specs.push(spec.clone());
        state.alive.insert(spec.label.clone());
        state.fullscreen.insert(spec.label.clone(), spec.fullscreen);
        Ok(())
    }

    fn is_alive(&self, label: &str) -> bool {
        self.state.lock().alive.contains(label)
    }

    fn show(&self, label: &str) -> Result<(), String> {
        self.record("show", label)
    }

    fn focus(&self, label: &str) -> Result<(), String> {
        self.record("focus", label)
    }

    fn close(&self, label: &str) -> Result<(), String> {
        self.record("close", label)
    }

    fn destroy(&self, label: &str) -> Result<(), String> {
        self.record("destroy", label)?;
        self.state.lock().alive.remove(label);
        Ok(())
    }

    fn minimize(&self, label: &str) -> Result<(), String> {
        self.record("minimize", label)
    }

    fn toggle_maximize(&self, label: &str) -> Result<(), String> {
        self.record("toggle_maximize", label)
    }

    fn is_fullscreen(&self, label: &str) -> bool {
        self.state
            .lock()
            .fullscreen
            .get(label)
            .copied()
            .unwrap_or(false)
    }

    fn set_fullscreen(&self, label: &str, fullscreen: bool) -> Result<(), String> {
        self.record("set_fullscreen", label)?;
        self.state
            .lock()
            .fullscreen
            .insert(label.to_string(), fullscreen);
        Ok(())
    }

    fn emit(&self, label: &str, event: &str, payload: Value) -> Result<(), String> {
        self.record("emit", label)?;
        self.state
            .lock()
            .emitted
            .push((label.to_string(), event.to_string(), payload));
        Ok(())
    }

    fn set_theme(&self, mode: ThemeMode) {
        self.state.lock().theme = Some(mode);
    }

    fn work_area(&self) -> Option<WorkArea> {
        self.state.lock().work_area
    }

    fn launch_instance(&self, args: &[String]) -> Result<(), String> {
        self.state.lock().launched.push(args.to_vec());
        Ok(())
    }
}
