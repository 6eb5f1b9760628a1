//! Shared test wiring: a state backed by recording doubles.

use std::sync::Arc;
use tempfile::TempDir;

use neuzos_config::{Config, ConfigStore, Icon, KeyBind, Layout, Session};
use neuzos_keybind::testing::RecordingHotkeys;
use neuzos_session::testing::MemoryContexts;
use neuzos_session::PartitionedSessionManager;
use neuzos_window::testing::RecordingHost;
use neuzos_window::ManualClock;

use crate::state::ApplicationState;

pub struct Fixture {
    pub state: ApplicationState,
    pub host: Arc<RecordingHost>,
    pub hotkeys: Arc<RecordingHotkeys>,
    pub contexts: Arc<MemoryContexts>,
    pub clock: Arc<ManualClock>,
    pub dir: TempDir,
}

pub fn session(id: &str) -> Session {
    Session {
        id: id.to_string(),
        label: id.to_uppercase(),
        icon: Icon::default(),
        src_overwrite: None,
        partition_overwrite: None,
    }
}

pub fn browser_session(id: &str) -> Session {
    Session {
        partition_overwrite: Some("browser".to_string()),
        ..session(id)
    }
}

pub fn layout(id: &str, session_ids: &[&str]) -> Layout {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "label": id,
        "rows": [{ "sessionIds": session_ids }],
    }))
    .unwrap()
}

pub fn config(sessions: Vec<Session>, key_binds: Vec<KeyBind>) -> Config {
    Config {
        sessions,
        key_binds,
        ..Config::default()
    }
}

pub fn fixture(config: Config) -> Fixture {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::open(dir.path().join("config")).unwrap();
    store.save(&config).unwrap();
    wire(dir, store)
}

/// A state whose store has nothing cached, with `raw` as the document on
/// disk; the first load goes through merge and sanitization.
pub fn fixture_from_disk(raw: &str) -> Fixture {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::open(dir.path().join("config")).unwrap();
    std::fs::write(store.path(), raw).unwrap();
    wire(dir, store)
}

fn wire(dir: TempDir, store: ConfigStore) -> Fixture {
    let contexts = Arc::new(MemoryContexts::new());
    let sessions = PartitionedSessionManager::new(contexts.clone(), dir.path().join("data"));
    let host = Arc::new(RecordingHost::new());
    let hotkeys = Arc::new(RecordingHotkeys::new());
    let clock = Arc::new(ManualClock::new());

    let state = ApplicationState::new(
        store,
        sessions,
        host.clone(),
        hotkeys.clone(),
        clock.clone(),
    );

    Fixture {
        state,
        host,
        hotkeys,
        contexts,
        clock,
        dir,
    }
}
