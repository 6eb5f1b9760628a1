//! NeuzOS Window Controller
//!
//! Four window roles, each with at most one live instance:
//! ```text
//! absent
//!   ↓ open
//! creating
//!   ↓ ready
//! visible
//!   ↓ close (guarded for primary / standalone)
//! closing
//!   ↓ destroyed
//! absent
//! ```
//! The UI runtime sits behind [`WindowHost`]; everything here is driven by
//! the host's focus/ready/close/destroyed callbacks.

mod close_guard;
mod controller;
mod error;
mod geometry;
mod host;
mod role;
mod window_spec;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use close_guard::{
    Clock, CloseDecision, CloseGuard, ManualClock, SystemClock, CLOSE_CONFIRM_THRESHOLD,
    CLOSE_CONFIRM_WINDOW,
};
pub use controller::{validate_standalone, CloseResponse, OpenOutcome, WindowController, WindowState};
pub use error::WindowError;
pub use geometry::{session_window_size, WindowSize, WorkArea};
pub use host::WindowHost;
pub use role::{StandaloneMode, WindowRole};
pub use window_spec::{WindowContent, WindowSpec};

pub type Result<T> = std::result::Result<T, WindowError>;
