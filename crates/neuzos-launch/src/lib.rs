//! NeuzOS Launch Modes
//!
//! Decides, once per process, which window the launcher opens first and
//! whether the process is bound to a single session.

mod error;
mod mode;
mod resolver;

pub use error::LaunchError;
pub use mode::LaunchMode;
pub use resolver::{resolve, LaunchArgs, LaunchPlan};

pub type Result<T> = std::result::Result<T, LaunchError>;
