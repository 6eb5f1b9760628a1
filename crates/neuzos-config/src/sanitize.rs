//! Document sanitization
//!
//! Runs on the merged JSON object on load, and on every saved document,
//! before it is turned into a typed
//! [`Config`](crate::Config). Invalid entries are removed in place, keeping
//! the order of everything that survives. Wrongly-typed top-level values are
//! reset to their default.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::schema::{KeyBind, LaunchDefaults, Layout, Session, ThemeMode};
use crate::vocabulary::KeybindEvent;

/// Chromium switches the launcher will pass through to the web runtime.
pub const ALLOWED_SWITCHES: &[&str] = &[
    "disable-frame-rate-limit",
    "disable-gpu-vsync",
    "disable-gpu",
    "enable-gpu-rasterization",
    "enable-zero-copy",
    "ignore-gpu-blocklist",
    "disable-background-timer-throttling",
    "disable-renderer-backgrounding",
    "disable-backgrounding-occluded-windows",
    "force_high_performance_gpu",
    "use-angle",
    "force-device-scale-factor",
];

pub fn available_switches() -> Vec<&'static str> {
    ALLOWED_SWITCHES.to_vec()
}

/// Strip everything the launcher does not accept from a merged document.
pub fn sanitize_document(doc: &mut Map<String, Value>, defaults: &Map<String, Value>) {
    sanitize_key_binds(doc, defaults);
    sanitize_switches(doc, defaults);
    sanitize_preferences(doc, defaults);
    retain_valid::<Session>(doc, defaults, "sessions");
    dedupe_sessions(doc);
    retain_valid::<Layout>(doc, defaults, "layouts");
    reset_if_invalid::<LaunchDefaults>(doc, defaults, "launchDefaults");
    reset_if_invalid::<Vec<Value>>(doc, defaults, "sessionActions");
}

fn sanitize_key_binds(doc: &mut Map<String, Value>, defaults: &Map<String, Value>) {
    let Some(Value::Array(binds)) = doc.get_mut("keyBinds") else {
        reset_to_default(doc, defaults, "keyBinds");
        return;
    };

    let before = binds.len();
    binds.retain(is_valid_key_bind);
    let dropped = before - binds.len();
    if dropped > 0 {
        tracing::warn!(dropped, "Dropped invalid keybinds from config");
    }
}

fn is_valid_key_bind(entry: &Value) -> bool {
    let key = entry.get("key").and_then(Value::as_str).unwrap_or("");
    let event = entry.get("event").and_then(Value::as_str).unwrap_or("");

    if key.trim().is_empty() || event.is_empty() || !KeybindEvent::is_allowed(event) {
        return false;
    }

    serde_json::from_value::<KeyBind>(entry.clone()).is_ok()
}

fn switch_name(switch: &str) -> &str {
    let trimmed = switch.trim().trim_start_matches("--");
    trimmed.split('=').next().unwrap_or(trimmed)
}

fn sanitize_switches(doc: &mut Map<String, Value>, defaults: &Map<String, Value>) {
    let Some(Value::Array(switches)) = doc.get_mut("chromiumSwitches") else {
        reset_to_default(doc, defaults, "chromiumSwitches");
        return;
    };

    switches.retain(|entry| {
        let allowed = entry
            .as_str()
            .map(|s| ALLOWED_SWITCHES.contains(&switch_name(s)))
            .unwrap_or(false);
        if !allowed {
            tracing::warn!(switch = %entry, "Dropped disallowed chromium switch");
        }
        allowed
    });
}

fn sanitize_preferences(doc: &mut Map<String, Value>, defaults: &Map<String, Value>) {
    let Some(Value::Object(preferences)) = doc.get_mut("preferences") else {
        reset_to_default(doc, defaults, "preferences");
        return;
    };

    let theme_ok = preferences
        .get("themeMode")
        .map(|v| serde_json::from_value::<ThemeMode>(v.clone()).is_ok())
        .unwrap_or(false);
    if !theme_ok {
        preferences.insert(
            "themeMode".to_string(),
            Value::String(ThemeMode::System.as_str().to_string()),
        );
    }
}

fn retain_valid<T: DeserializeOwned>(
    doc: &mut Map<String, Value>,
    defaults: &Map<String, Value>,
    key: &str,
) {
    let Some(Value::Array(entries)) = doc.get_mut(key) else {
        reset_to_default(doc, defaults, key);
        return;
    };

    let before = entries.len();
    entries.retain(|entry| serde_json::from_value::<T>(entry.clone()).is_ok());
    let dropped = before - entries.len();
    if dropped > 0 {
        tracing::warn!(key, dropped, "Dropped malformed entries from config");
    }
}

fn dedupe_sessions(doc: &mut Map<String, Value>) {
    let Some(Value::Array(sessions)) = doc.get_mut("sessions") else {
        return;
    };

    let mut seen = HashSet::new();
    sessions.retain(|session| {
        let id = session
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let first = seen.insert(id.clone());
        if !first {
            tracing::warn!(session_id = %id, "Dropped duplicate session id from config");
        }
        first
    });
}

fn reset_if_invalid<T: DeserializeOwned>(
    doc: &mut Map<String, Value>,
    defaults: &Map<String, Value>,
    key: &str,
) {
    let valid = doc
        .get(key)
        .map(|v| serde_json::from_value::<T>(v.clone()).is_ok())
        .unwrap_or(false);
    if !valid {
        reset_to_default(doc, defaults, key);
    }
}

fn reset_to_default(doc: &mut Map<String, Value>, defaults: &Map<String, Value>, key: &str) {
    tracing::warn!(key, "Config value has the wrong shape, using default");
    let value = defaults.get(key).cloned().unwrap_or(Value::Null);
    doc.insert(key.to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Config;
    use serde_json::json;

    fn sanitized(doc: Value) -> Map<String, Value> {
        let defaults = Config::default_document();
        let mut merged = defaults.clone();
        if let Value::Object(map) = doc {
            merged.extend(map);
        }
        sanitize_document(&mut merged, &defaults);
        merged
    }

    #[test]
    fn test_key_binds_drop_exactly_invalid_entries() {
        let doc = sanitized(json!({
            "keyBinds": [
                { "key": "F1", "event": "layout_switch", "args": ["l1"] },
                { "key": "F2", "event": "not_an_event" },
                { "key": "", "event": "fullscreen_toggle" },
                { "key": "F3", "event": "" },
                { "key": "F4" },
                { "key": "F11", "event": "fullscreen_toggle" },
                { "key": "F5", "event": "custom_event", "args": ["ping", "1"] }
            ]
        }));

        let keys: Vec<&str> = doc["keyBinds"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["key"].as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["F1", "F11", "F5"]);
    }

    #[test]
    fn test_malformed_accelerators_survive_load() {
        // Accelerator syntax is checked at registration, not here.
        let doc = sanitized(json!({
            "keyBinds": [{ "key": "ctrl+++", "event": "fullscreen_toggle" }]
        }));
        assert_eq!(doc["keyBinds"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_switches_filtered_against_allow_list() {
        let doc = sanitized(json!({
            "chromiumSwitches": [
                "disable-frame-rate-limit",
                "--use-angle=gl",
                "remote-debugging-port=9222",
                42
            ]
        }));
        assert_eq!(
            doc["chromiumSwitches"],
            json!(["disable-frame-rate-limit", "--use-angle=gl"])
        );
    }

    #[test]
    fn test_wrong_shapes_reset_to_default() {
        let doc = sanitized(json!({
            "sessions": "nope",
            "keyBinds": {},
            "launchDefaults": 3,
            "preferences": { "themeMode": "sepia" }
        }));
        assert_eq!(doc["sessions"], json!([]));
        assert_eq!(doc["keyBinds"], Config::default_document()["keyBinds"]);
        assert_eq!(doc["launchDefaults"]["defaultLaunchMode"], json!("normal"));
        assert_eq!(doc["preferences"]["themeMode"], json!("system"));
    }

    #[test]
    fn test_duplicate_and_malformed_sessions_dropped() {
        let doc = sanitized(json!({
            "sessions": [
                { "id": "a", "label": "A", "icon": { "slug": "x" } },
                { "label": "no id", "icon": { "slug": "x" } },
                { "id": "a", "label": "A again", "icon": { "slug": "x" } },
                { "id": "b", "label": "B", "icon": { "slug": "y" } }
            ]
        }));
        let labels: Vec<&str> = doc["sessions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["label"].as_str().unwrap())
            .collect();
        assert_eq!(labels, vec!["A", "B"]);
    }
}
