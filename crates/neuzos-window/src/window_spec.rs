//! Per-role window construction parameters

use std::path::PathBuf;

use neuzos_config::Session;

use crate::geometry::{session_window_size, WindowSize, WorkArea};
use crate::role::{StandaloneMode, WindowRole};

const APP_TITLE: &str = "NeuzOS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowContent {
    /// Page bundled with the app
    App(String),
    /// Remote page, e.g. the game client
    External(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub role: WindowRole,
    pub label: String,
    pub title: String,
    pub size: WindowSize,
    pub min_size: Option<WindowSize>,
    pub resizable: bool,
    pub fullscreen: bool,
    pub content: WindowContent,
    /// The page may talk to the launcher through the command bridge;
    /// without it, new-window requests are handed to the OS
    pub bridge: bool,
    /// Partition storage directory; `None` uses the default context
    pub data_dir: Option<PathBuf>,
    /// Extra switches for the web runtime
    pub browser_args: Vec<String>,
}

impl WindowSpec {
    pub fn primary(work_area: Option<WorkArea>) -> Self {
        Self {
            role: WindowRole::Primary,
            label: WindowRole::Primary.label().to_string(),
            title: APP_TITLE.to_string(),
            size: session_window_size(work_area),
            min_size: Some(WindowSize::new(800, 600)),
            resizable: true,
            fullscreen: false,
            content: WindowContent::App("index.html".to_string()),
            bridge: true,
            data_dir: None,
            browser_args: Vec::new(),
        }
    }

    pub fn settings() -> Self {
        Self {
            role: WindowRole::Settings,
            label: WindowRole::Settings.label().to_string(),
            title: format!("{} Settings", APP_TITLE),
            size: WindowSize::new(960, 720),
            min_size: Some(WindowSize::new(640, 480)),
            resizable: true,
            fullscreen: false,
            content: WindowContent::App("settings.html".to_string()),
            bridge: true,
            data_dir: None,
            browser_args: Vec::new(),
        }
    }

    pub fn session_launcher() -> Self {
        Self {
            role: WindowRole::SessionLauncher,
            label: WindowRole::SessionLauncher.label().to_string(),
            title: APP_TITLE.to_string(),
            size: WindowSize::new(420, 600),
            min_size: None,
            resizable: false,
            fullscreen: false,
            content: WindowContent::App("launcher.html".to_string()),
            bridge: true,
            data_dir: None,
            browser_args: Vec::new(),
        }
    }

    /// Game window bound to one session partition. The game page gets no
    /// bridge access.
    pub fn standalone(
        session: &Session,
        mode: StandaloneMode,
        data_dir: PathBuf,
        work_area: Option<WorkArea>,
    ) -> Self {
        Self {
            role: WindowRole::StandaloneSession,
            label: WindowRole::StandaloneSession.label().to_string(),
            title: format!("{} - {}", session.label, APP_TITLE),
            size: session_window_size(work_area),
            min_size: None,
            resizable: true,
            fullscreen: mode.pins_fullscreen(),
            content: WindowContent::External(session.game_url().to_string()),
            bridge: false,
            data_dir: Some(data_dir),
            browser_args: Vec::new(),
        }
    }

    pub fn with_size(mut self, size: WindowSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_browser_args(mut self, args: Vec<String>) -> Self {
        self.browser_args = args;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_launcher_pages_get_the_bridge() {
        let session: Session = serde_json::from_value(serde_json::json!({
            "id": "s1",
            "label": "Main",
            "icon": { "slug": "x" },
        }))
        .unwrap();

        assert!(WindowSpec::primary(None).bridge);
        assert!(WindowSpec::settings().bridge);
        assert!(WindowSpec::session_launcher().bridge);
        let standalone = WindowSpec::standalone(
            &session,
            StandaloneMode::Session,
            PathBuf::from("/p"),
            None,
        );
        assert!(!standalone.bridge);
        assert_eq!(standalone.data_dir, Some(PathBuf::from("/p")));
    }
}
