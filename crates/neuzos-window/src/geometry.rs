//! Window geometry

use serde::{Deserialize, Serialize};

/// Usable area of the primary display, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkArea {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Used when the host cannot report a work area.
pub const FALLBACK_SIZE: WindowSize = WindowSize::new(1280, 800);

/// Size for windows that host the game.
///
/// Leaves a 1/12 margin of the work area. Ultra-wide displays (aspect ratio
/// of 2 or more) get half the width instead so two instances fit side by side.
pub fn session_window_size(work_area: Option<WorkArea>) -> WindowSize {
    let Some(area) = work_area.filter(|a| a.width > 0 && a.height > 0) else {
        return FALLBACK_SIZE;
    };

    let width = area.width as f64;
    let height = area.height as f64;
    let aspect = width / height;

    let window_width = if aspect >= 2.0 {
        width / 2.0
    } else {
        width - width / 12.0
    };
    let window_height = height - height / 12.0;

    WindowSize::new(window_width.floor() as u32, window_height.floor() as u32)
}
