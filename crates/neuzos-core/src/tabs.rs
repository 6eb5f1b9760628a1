//! Layout tabs
//!
//! The primary window shows open layouts as tabs. The page owns rendering;
//! the core keeps the order and the active/previous pair so every window
//! sees the same state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabsSnapshot {
    pub open: Vec<String>,
    pub active: Option<String>,
    pub previous: Option<String>,
}

#[derive(Debug, Default)]
pub struct LayoutTabs {
    open: Vec<String>,
    active: Option<String>,
    previous: Option<String>,
}

impl LayoutTabs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a layout (if not already open) and make it active.
    pub fn add(&mut self, layout_id: &str) {
        if !self.is_open(layout_id) {
            self.open.push(layout_id.to_string());
        }
        self.activate(layout_id);
    }

    /// Make an open layout active. Unknown ids are opened first.
    pub fn switch(&mut self, layout_id: &str) {
        self.add(layout_id);
    }

    pub fn close(&mut self, layout_id: &str) {
        let Some(index) = self.open.iter().position(|id| id == layout_id) else {
            return;
        };
        self.open.remove(index);

        if self.previous.as_deref() == Some(layout_id) {
            self.previous = None;
        }
        if self.active.as_deref() == Some(layout_id) {
            // Fall back to the previous tab, then to the closed tab's neighbour
            self.active = self.previous.take().or_else(|| {
                let neighbour = index.min(self.open.len().saturating_sub(1));
                self.open.get(neighbour).cloned()
            });
        }
    }

    pub fn close_all(&mut self) {
        self.open.clear();
        self.active = None;
        self.previous = None;
    }

    pub fn is_open(&self, layout_id: &str) -> bool {
        self.open.iter().any(|id| id == layout_id)
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn snapshot(&self) -> TabsSnapshot {
        TabsSnapshot {
            open: self.open.clone(),
            active: self.active.clone(),
            previous: self.previous.clone(),
        }
    }

    fn activate(&mut self, layout_id: &str) {
        if self.active.as_deref() == Some(layout_id) {
            return;
        }
        self.previous = self.active.replace(layout_id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_activates_and_tracks_previous() {
        let mut tabs = LayoutTabs::new();
        tabs.add("a");
        tabs.add("b");

        let snap = tabs.snapshot();
        assert_eq!(snap.open, vec!["a", "b"]);
        assert_eq!(snap.active.as_deref(), Some("b"));
        assert_eq!(snap.previous.as_deref(), Some("a"));
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut tabs = LayoutTabs::new();
        tabs.add("a");
        tabs.add("a");
        assert_eq!(tabs.snapshot().open, vec!["a"]);
        assert_eq!(tabs.snapshot().previous, None);
    }

    #[test]
    fn test_close_active_falls_back_to_previous() {
        let mut tabs = LayoutTabs::new();
        tabs.add("a");
        tabs.add("b");
        tabs.add("c");
        tabs.switch("a");

        tabs.close("a");
        assert_eq!(tabs.active(), Some("c"));
        assert_eq!(tabs.snapshot().open, vec!["b", "c"]);
    }

    #[test]
    fn test_close_active_without_previous_uses_neighbour() {
        let mut tabs = LayoutTabs::new();
        tabs.add("a");
        tabs.add("b");
        tabs.close("a");
        // "a" was previous, so it is gone; "b" stays active
        assert_eq!(tabs.active(), Some("b"));

        tabs.close("b");
        assert_eq!(tabs.active(), None);
    }

    #[test]
    fn test_close_unknown_is_noop() {
        let mut tabs = LayoutTabs::new();
        tabs.add("a");
        tabs.close("zzz");
        assert_eq!(tabs.snapshot().open, vec!["a"]);
    }

    #[test]
    fn test_close_all() {
        let mut tabs = LayoutTabs::new();
        tabs.add("a");
        tabs.add("b");
        tabs.close_all();
        assert_eq!(tabs.snapshot(), TabsSnapshot::default());
    }
}
