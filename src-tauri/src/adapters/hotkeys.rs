use parking_lot::Mutex;
use std::collections::HashMap;
use tauri::AppHandle;
use tauri_plugin_global_shortcut::{Code, GlobalShortcutExt, Modifiers, Shortcut};

use neuzos_core::keybind::{
    Accelerator, HotkeyBackend, MOD_ALT, MOD_ALT_GR, MOD_CMD_OR_CTRL, MOD_COMMAND, MOD_CONTROL,
    MOD_SHIFT, MOD_SUPER,
};

const LETTERS: [Code; 26] = [
    Code::KeyA,
    Code::KeyB,
    Code::KeyC,
    Code::KeyD,
    Code::KeyE,
    Code::KeyF,
    Code::KeyG,
    Code::KeyH,
    Code::KeyI,
    Code::KeyJ,
    Code::KeyK,
    Code::KeyL,
    Code::KeyM,
    Code::KeyN,
    Code::KeyO,
    Code::KeyP,
    Code::KeyQ,
    Code::KeyR,
    Code::KeyS,
    Code::KeyT,
    Code::KeyU,
    Code::KeyV,
    Code::KeyW,
    Code::KeyX,
    Code::KeyY,
    Code::KeyZ,
];

const DIGITS: [Code; 10] = [
    Code::Digit0,
    Code::Digit1,
    Code::Digit2,
    Code::Digit3,
    Code::Digit4,
    Code::Digit5,
    Code::Digit6,
    Code::Digit7,
    Code::Digit8,
    Code::Digit9,
];

const NUMPAD: [Code; 10] = [
    Code::Numpad0,
    Code::Numpad1,
    Code::Numpad2,
    Code::Numpad3,
    Code::Numpad4,
    Code::Numpad5,
    Code::Numpad6,
    Code::Numpad7,
    Code::Numpad8,
    Code::Numpad9,
];

const FUNCTION_KEYS: [Code; 24] = [
    Code::F1,
    Code::F2,
    Code::F3,
    Code::F4,
    Code::F5,
    Code::F6,
    Code::F7,
    Code::F8,
    Code::F9,
    Code::F10,
    Code::F11,
    Code::F12,
    Code::F13,
    Code::F14,
    Code::F15,
    Code::F16,
    Code::F17,
    Code::F18,
    Code::F19,
    Code::F20,
    Code::F21,
    Code::F22,
    Code::F23,
    Code::F24,
];

/// Physical key for a canonical key name, and whether the character needs
/// Shift on a US layout.
fn physical_key(key: &str) -> Option<(Code, bool)> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return single_char_key(c);
    }

    if let Some(n) = key.strip_prefix('F').and_then(|n| n.parse::<usize>().ok()) {
        return FUNCTION_KEYS.get(n.checked_sub(1)?).map(|&code| (code, false));
    }
    if let Some(n) = key.strip_prefix("Num").and_then(|n| n.parse::<usize>().ok()) {
        return NUMPAD.get(n).map(|&code| (code, false));
    }

    let code = match key {
        "Plus" => return Some((Code::Equal, true)),
        "Space" => Code::Space,
        "Tab" => Code::Tab,
        "Capslock" => Code::CapsLock,
        "Numlock" => Code::NumLock,
        "Scrolllock" => Code::ScrollLock,
        "Backspace" => Code::Backspace,
        "Delete" => Code::Delete,
        "Insert" => Code::Insert,
        "Enter" => Code::Enter,
        "Up" => Code::ArrowUp,
        "Down" => Code::ArrowDown,
        "Left" => Code::ArrowLeft,
        "Right" => Code::ArrowRight,
        "Home" => Code::Home,
        "End" => Code::End,
        "PageUp" => Code::PageUp,
        "PageDown" => Code::PageDown,
        "Escape" => Code::Escape,
        "PrintScreen" => Code::PrintScreen,
        "VolumeUp" => Code::AudioVolumeUp,
        "VolumeDown" => Code::AudioVolumeDown,
        "VolumeMute" => Code::AudioVolumeMute,
        "MediaNextTrack" => Code::MediaTrackNext,
        "MediaPreviousTrack" => Code::MediaTrackPrevious,
        "MediaStop" => Code::MediaStop,
        "MediaPlayPause" => Code::MediaPlayPause,
        "NumDec" => Code::NumpadDecimal,
        "NumAdd" => Code::NumpadAdd,
        "NumSub" => Code::NumpadSubtract,
        "NumMult" => Code::NumpadMultiply,
        "NumDiv" => Code::NumpadDivide,
        _ => return None,
    };
    Some((code, false))
}

fn single_char_key(c: char) -> Option<(Code, bool)> {
    if c.is_ascii_uppercase() {
        return Some((LETTERS[(c as u8 - b'A') as usize], false));
    }
    if c.is_ascii_digit() {
        return Some((DIGITS[(c as u8 - b'0') as usize], false));
    }

    let shifted = |code: Code| Some((code, true));
    let plain = |code: Code| Some((code, false));
    match c {
        ')' => shifted(Code::Digit0),
        '!' => shifted(Code::Digit1),
        '@' => shifted(Code::Digit2),
        '#' => shifted(Code::Digit3),
        '$' => shifted(Code::Digit4),
        '%' => shifted(Code::Digit5),
        '^' => shifted(Code::Digit6),
        '&' => shifted(Code::Digit7),
        '*' => shifted(Code::Digit8),
        '(' => shifted(Code::Digit9),
        ':' => shifted(Code::Semicolon),
        '<' => shifted(Code::Comma),
        '>' => shifted(Code::Period),
        '_' => shifted(Code::Minus),
        '?' => shifted(Code::Slash),
        '~' => shifted(Code::Backquote),
        '{' => shifted(Code::BracketLeft),
        '}' => shifted(Code::BracketRight),
        '|' => shifted(Code::Backslash),
        '"' => shifted(Code::Quote),
        ';' => plain(Code::Semicolon),
        '=' => plain(Code::Equal),
        ',' => plain(Code::Comma),
        '-' => plain(Code::Minus),
        '.' => plain(Code::Period),
        '/' => plain(Code::Slash),
        '`' => plain(Code::Backquote),
        '[' => plain(Code::BracketLeft),
        ']' => plain(Code::BracketRight),
        '\\' => plain(Code::Backslash),
        '\'' => plain(Code::Quote),
        _ => None,
    }
}

fn modifiers(accelerator: &Accelerator) -> Modifiers {
    let mut mods = Modifiers::empty();
    if accelerator.has(MOD_CMD_OR_CTRL) {
        mods |= if cfg!(target_os = "macos") {
            Modifiers::SUPER
        } else {
            Modifiers::CONTROL
        };
    }
    if accelerator.has(MOD_CONTROL) {
        mods |= Modifiers::CONTROL;
    }
    if accelerator.has(MOD_COMMAND) || accelerator.has(MOD_SUPER) {
        mods |= Modifiers::SUPER;
    }
    if accelerator.has(MOD_ALT) || accelerator.has(MOD_ALT_GR) {
        mods |= Modifiers::ALT;
    }
    if accelerator.has(MOD_SHIFT) {
        mods |= Modifiers::SHIFT;
    }
    mods
}

/// Platform shortcut for an accelerator.
pub fn to_shortcut(accelerator: &Accelerator) -> Option<Shortcut> {
    let (code, needs_shift) = physical_key(accelerator.key())?;
    let mut mods = modifiers(accelerator);
    if needs_shift {
        mods |= Modifiers::SHIFT;
    }
    let mods = (!mods.is_empty()).then_some(mods);
    Some(Shortcut::new(mods, code))
}

/// Global hotkeys through the OS, keyed back to the accelerator that
/// registered them.
pub struct TauriHotkeys {
    app: AppHandle,
    ids: Mutex<HashMap<u32, Accelerator>>,
}

impl TauriHotkeys {
    pub fn new(app: AppHandle) -> Self {
        Self {
            app,
            ids: Mutex::new(HashMap::new()),
        }
    }

    pub fn lookup(&self, shortcut: &Shortcut) -> Option<Accelerator> {
        self.ids.lock().get(&shortcut.id()).cloned()
    }
}

impl HotkeyBackend for TauriHotkeys {
    fn register(&self, accelerator: &Accelerator) -> Result<(), String> {
        let shortcut = to_shortcut(accelerator)
            .ok_or_else(|| format!("no physical key for {}", accelerator))?;
        let id = shortcut.id();

        self.app
            .global_shortcut()
            .register(shortcut)
            .map_err(|e| e.to_string())?;
        self.ids.lock().insert(id, accelerator.clone());
        Ok(())
    }

    fn unregister_all(&self) -> Result<(), String> {
        self.ids.lock().clear();
        self.app
            .global_shortcut()
            .unregister_all()
            .map_err(|e| e.to_string())
    }
}
