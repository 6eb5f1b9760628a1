//! Accelerator strings
//!
//! `+`-separated, case-insensitive, any number of distinct modifiers
//! followed by exactly one key: `CmdOrCtrl+Shift+F1`, `Alt+num5`, `F11`.
//! The `+` key itself is spelled `Plus`.

use std::fmt;
use std::str::FromStr;

use crate::error::AcceleratorError;

pub const MOD_CMD_OR_CTRL: u8 = 1 << 0;
pub const MOD_CONTROL: u8 = 1 << 1;
pub const MOD_COMMAND: u8 = 1 << 2;
pub const MOD_ALT: u8 = 1 << 3;
pub const MOD_ALT_GR: u8 = 1 << 4;
pub const MOD_SHIFT: u8 = 1 << 5;
pub const MOD_SUPER: u8 = 1 << 6;

/// Display order and canonical spelling.
const MODIFIER_NAMES: [(u8, &str); 7] = [
    (MOD_CMD_OR_CTRL, "CommandOrControl"),
    (MOD_CONTROL, "Control"),
    (MOD_COMMAND, "Command"),
    (MOD_ALT, "Alt"),
    (MOD_ALT_GR, "AltGr"),
    (MOD_SHIFT, "Shift"),
    (MOD_SUPER, "Super"),
];

fn parse_modifier(token: &str) -> Option<u8> {
    let bit = match token.to_ascii_lowercase().as_str() {
        "commandorcontrol" | "cmdorctrl" => MOD_CMD_OR_CTRL,
        "control" | "ctrl" => MOD_CONTROL,
        "command" | "cmd" => MOD_COMMAND,
        "alt" | "option" => MOD_ALT,
        "altgr" => MOD_ALT_GR,
        "shift" => MOD_SHIFT,
        "super" | "meta" => MOD_SUPER,
        _ => return None,
    };
    Some(bit)
}

const NAMED_KEYS: &[&str] = &[
    "Plus",
    "Space",
    "Tab",
    "Capslock",
    "Numlock",
    "Scrolllock",
    "Backspace",
    "Delete",
    "Insert",
    "Enter",
    "Up",
    "Down",
    "Left",
    "Right",
    "Home",
    "End",
    "PageUp",
    "PageDown",
    "Escape",
    "PrintScreen",
    "VolumeUp",
    "VolumeDown",
    "VolumeMute",
    "MediaNextTrack",
    "MediaPreviousTrack",
    "MediaStop",
    "MediaPlayPause",
    "NumDec",
    "NumAdd",
    "NumSub",
    "NumMult",
    "NumDiv",
];

const PUNCTUATION: &str = ")!@#$%^&*(:;<=>,_-.?/~`{}[]|\\\"'";

/// Canonical spelling of a key token, or `None` if it names no key.
fn canonical_key(token: &str) -> Option<String> {
    let lower = token.to_ascii_lowercase();

    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphanumeric() {
            return Some(c.to_ascii_uppercase().to_string());
        }
        if PUNCTUATION.contains(c) {
            return Some(c.to_string());
        }
        return None;
    }

    match lower.as_str() {
        "return" => return Some("Enter".to_string()),
        "esc" => return Some("Escape".to_string()),
        _ => {}
    }

    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=24).contains(&n) && !lower[1..].starts_with('0') {
            return Some(format!("F{}", n));
        }
    }

    if let Some(digit) = lower.strip_prefix("num") {
        if digit.len() == 1 && digit.as_bytes()[0].is_ascii_digit() {
            return Some(format!("Num{}", digit));
        }
    }

    NAMED_KEYS
        .iter()
        .find(|name| name.eq_ignore_ascii_case(&lower))
        .map(|name| name.to_string())
}

/// A parsed key combination. Two accelerators written differently but
/// naming the same combination compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Accelerator {
    modifiers: u8,
    key: String,
}

impl Accelerator {
    pub fn parse(input: &str) -> Result<Self, AcceleratorError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AcceleratorError::Empty);
        }

        let mut modifiers = 0u8;
        let mut key: Option<String> = None;

        for raw in trimmed.split('+') {
            let token = raw.trim();
            if token.is_empty() {
                return Err(AcceleratorError::EmptyToken(input.to_string()));
            }

            if let Some(bit) = parse_modifier(token) {
                if key.is_some() {
                    // Modifiers must come before the key
                    return Err(AcceleratorError::MultipleKeys(input.to_string()));
                }
                if modifiers & bit != 0 {
                    return Err(AcceleratorError::DuplicateModifier {
                        accelerator: input.to_string(),
                        modifier: token.to_string(),
                    });
                }
                modifiers |= bit;
                continue;
            }

            if key.is_some() {
                return Err(AcceleratorError::MultipleKeys(input.to_string()));
            }
            key = Some(canonical_key(token).ok_or_else(|| AcceleratorError::UnknownKey {
                accelerator: input.to_string(),
                key: token.to_string(),
            })?);
        }

        let key = key.ok_or_else(|| AcceleratorError::MissingKey(input.to_string()))?;
        Ok(Self { modifiers, key })
    }

    pub fn modifiers(&self) -> u8 {
        self.modifiers
    }

    pub fn has(&self, modifier: u8) -> bool {
        self.modifiers & modifier != 0
    }

    /// Canonical key name, e.g. `A`, `F11`, `Num5`, `Plus`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Canonical modifier names in display order.
    pub fn modifier_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        MODIFIER_NAMES
            .iter()
            .filter(move |(bit, _)| self.modifiers & bit != 0)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.modifier_names() {
            write!(f, "{}+", name)?;
        }
        write!(f, "{}", self.key)
    }
}

impl FromStr for Accelerator {
    type Err = AcceleratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Accelerator::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_canonicalize() {
        let accel = Accelerator::parse("ctrl+shift+a").unwrap();
        assert!(accel.has(MOD_CONTROL));
        assert!(accel.has(MOD_SHIFT));
        assert_eq!(accel.key(), "A");
        assert_eq!(accel.to_string(), "Control+Shift+A");
    }

    #[test]
    fn test_aliases_are_equal() {
        assert_eq!(
            Accelerator::parse("CmdOrCtrl+Option+Esc").unwrap(),
            Accelerator::parse("commandorcontrol+alt+escape").unwrap()
        );
        assert_eq!(
            Accelerator::parse("Shift+Control+1").unwrap(),
            Accelerator::parse("Control+Shift+1").unwrap()
        );
    }

    #[test]
    fn test_bare_keys() {
        assert_eq!(Accelerator::parse("F11").unwrap().to_string(), "F11");
        assert_eq!(Accelerator::parse("num7").unwrap().key(), "Num7");
        assert_eq!(Accelerator::parse("Alt+Plus").unwrap().to_string(), "Alt+Plus");
        assert_eq!(Accelerator::parse("Return").unwrap().key(), "Enter");
        assert_eq!(Accelerator::parse("Ctrl+/").unwrap().key(), "/");
    }

    #[test]
    fn test_malformed() {
        assert_eq!(Accelerator::parse(""), Err(AcceleratorError::Empty));
        assert!(matches!(
            Accelerator::parse("ctrl+++"),
            Err(AcceleratorError::EmptyToken(_))
        ));
        assert!(matches!(
            Accelerator::parse("Ctrl+Ctrl+A"),
            Err(AcceleratorError::DuplicateModifier { .. })
        ));
        assert!(matches!(
            Accelerator::parse("Ctrl+Shift"),
            Err(AcceleratorError::MissingKey(_))
        ));
        assert!(matches!(
            Accelerator::parse("A+B"),
            Err(AcceleratorError::MultipleKeys(_))
        ));
        assert!(matches!(
            Accelerator::parse("Ctrl+Hyper"),
            Err(AcceleratorError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_function_key_range() {
        assert!(Accelerator::parse("F24").is_ok());
        assert!(Accelerator::parse("F25").is_err());
        assert!(Accelerator::parse("F0").is_err());
        assert!(Accelerator::parse("F01").is_err());
    }

    #[test]
    fn test_modifier_after_key_is_rejected() {
        assert!(Accelerator::parse("A+Shift").is_err());
    }
}
