//! Error types for keybind registration

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcceleratorError {
    #[error("Accelerator is empty")]
    Empty,

    #[error("Accelerator '{0}' has an empty token")]
    EmptyToken(String),

    #[error("Accelerator '{accelerator}' repeats modifier '{modifier}'")]
    DuplicateModifier {
        accelerator: String,
        modifier: String,
    },

    #[error("Accelerator '{0}' has no key")]
    MissingKey(String),

    #[error("Accelerator '{0}' has more than one key")]
    MultipleKeys(String),

    #[error("Accelerator '{accelerator}' uses unknown key '{key}'")]
    UnknownKey { accelerator: String, key: String },
}

#[derive(Error, Debug)]
pub enum KeybindError {
    #[error("Invalid keybind '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: AcceleratorError,
    },

    #[error("Failed to register keybind '{key}': {reason}")]
    Registration { key: String, reason: String },
}
