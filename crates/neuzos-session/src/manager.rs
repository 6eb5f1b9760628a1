//! Partitioned session manager
//!
//! Maps session ids to partitions and runs the clear/destroy lifecycle.
//! It does not know which windows or views read from a partition; callers
//! stop those views before any destructive call.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::SessionError;
use crate::partition::Partition;
use crate::runtime::BrowsingContextRuntime;
use crate::Result;

pub struct PartitionedSessionManager {
    /// Webview runtime owning the actual contexts
    runtime: Arc<dyn BrowsingContextRuntime>,
    /// App user-data dir; partition dirs live strictly below it
    user_data_dir: PathBuf,
    /// Partitions referenced so far, keyed by session id
    contexts: Arc<RwLock<HashMap<String, Partition>>>,
}

impl PartitionedSessionManager {
    pub fn new(
        runtime: Arc<dyn BrowsingContextRuntime>,
        user_data_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runtime,
            user_data_dir: user_data_dir.into(),
            contexts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn user_data_dir(&self) -> &Path {
        &self.user_data_dir
    }

    /// Partition for a session, recorded on first reference. Ids that cannot
    /// map to their own directory are refused before the runtime sees them.
    pub fn partition(&self, session_id: &str) -> Result<Partition> {
        if let Some(partition) = self.contexts.read().get(session_id) {
            return Ok(partition.clone());
        }

        let partition = Partition::for_session(session_id)?;
        partition.storage_dir(&self.user_data_dir)?;
        self.contexts
            .write()
            .entry(session_id.to_string())
            .or_insert_with(|| partition.clone());

        tracing::debug!(partition = %partition, "Referenced session partition");
        Ok(partition)
    }

    /// Storage directory to hand to the webview runtime for a session.
    pub fn partition_dir(&self, session_id: &str) -> Result<PathBuf> {
        self.partition(session_id)?.storage_dir(&self.user_data_dir)
    }

    pub fn known_partitions(&self) -> Vec<Partition> {
        self.contexts.read().values().cloned().collect()
    }

    pub async fn clear_cache(&self, session_id: &str) -> Result<()> {
        let partition = self.partition(session_id)?;
        self.runtime
            .clear_cache(&partition)
            .await
            .map_err(|reason| runtime_error(&partition, reason))?;

        tracing::info!(session_id = %session_id, "Cleared session cache");
        Ok(())
    }

    pub async fn clear_storage_data(&self, session_id: &str) -> Result<()> {
        let partition = self.partition(session_id)?;
        self.runtime
            .clear_storage_data(&partition)
            .await
            .map_err(|reason| runtime_error(&partition, reason))?;

        tracing::info!(session_id = %session_id, "Cleared session storage");
        Ok(())
    }

    /// Clear storage, then remove the partition directory.
    ///
    /// Directory removal is advisory: an absent or locked directory is logged
    /// and otherwise ignored. A directory that would resolve outside the
    /// partitions root is refused before anything is touched.
    pub async fn destroy_partition(&self, session_id: &str) -> Result<()> {
        let partition = self.partition(session_id)?;
        let dir = partition.storage_dir(&self.user_data_dir)?;

        self.clear_storage_data(session_id).await?;

        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {
                tracing::info!(
                    session_id = %session_id,
                    dir = %dir.display(),
                    "Removed partition directory"
                );
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(session_id = %session_id, "No partition directory to remove");
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %session_id,
                    dir = %dir.display(),
                    "Failed to remove partition directory: {}",
                    e
                );
            }
        }

        self.contexts.write().remove(session_id);
        Ok(())
    }
}

impl Clone for PartitionedSessionManager {
    fn clone(&self) -> Self {
        Self {
            runtime: Arc::clone(&self.runtime),
            user_data_dir: self.user_data_dir.clone(),
            contexts: Arc::clone(&self.contexts),
        }
    }
}

fn runtime_error(partition: &Partition, reason: String) -> SessionError {
    SessionError::Runtime {
        partition: partition.name(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryContexts;
    use tempfile::TempDir;

    fn manager(tmp: &TempDir) -> (PartitionedSessionManager, Arc<MemoryContexts>) {
        let runtime = Arc::new(MemoryContexts::new());
        let manager = PartitionedSessionManager::new(runtime.clone(), tmp.path());
        (manager, runtime)
    }

    #[tokio::test]
    async fn test_clear_on_unused_session_is_safe() {
        let tmp = TempDir::new().unwrap();
        let (manager, runtime) = manager(&tmp);

        manager.clear_cache("fresh").await.unwrap();
        manager.clear_storage_data("fresh").await.unwrap();
        assert_eq!(
            runtime.calls(),
            vec!["clear_cache persist:fresh", "clear_storage persist:fresh"]
        );
    }

    #[tokio::test]
    async fn test_clearing_one_partition_leaves_others() {
        let tmp = TempDir::new().unwrap();
        let (manager, runtime) = manager(&tmp);
        runtime.seed("persist:a", "a-cookie", "a-cache");
        runtime.seed("persist:b", "b-cookie", "b-cache");

        manager.clear_storage_data("a").await.unwrap();
        manager.clear_cache("a").await.unwrap();

        assert!(runtime.storage("persist:a").is_empty());
        assert!(runtime.cache("persist:a").is_empty());
        assert_eq!(runtime.storage("persist:b"), vec!["b-cookie"]);
        assert_eq!(runtime.cache("persist:b"), vec!["b-cache"]);
    }

    #[tokio::test]
    async fn test_destroy_removes_directory() {
        let tmp = TempDir::new().unwrap();
        let (manager, runtime) = manager(&tmp);
        let dir = manager.partition_dir("s1").unwrap();
        std::fs::create_dir_all(dir.join("Local Storage")).unwrap();
        let sibling = manager.partition_dir("s2").unwrap();
        std::fs::create_dir_all(&sibling).unwrap();

        manager.destroy_partition("s1").await.unwrap();

        assert!(!dir.exists());
        assert!(sibling.exists());
        assert_eq!(runtime.calls(), vec!["clear_storage persist:s1"]);
        assert!(manager.known_partitions().iter().all(|p| p.session_id() != "s1"));
    }

    #[tokio::test]
    async fn test_destroy_without_directory_succeeds() {
        let tmp = TempDir::new().unwrap();
        let (manager, _runtime) = manager(&tmp);
        manager.destroy_partition("never-used").await.unwrap();
    }

    #[tokio::test]
    async fn test_destroy_refuses_traversal() {
        let tmp = TempDir::new().unwrap();
        let (manager, runtime) = manager(&tmp);
        let victim = tmp.path().join("keep-me");
        std::fs::create_dir_all(&victim).unwrap();

        let result = manager.destroy_partition("../keep-me").await;
        assert!(matches!(result, Err(SessionError::PathEscape { .. })));
        assert!(victim.exists());
        assert!(runtime.calls().is_empty());
    }

    #[tokio::test]
    async fn test_aliasing_ids_cannot_touch_another_session() {
        let tmp = TempDir::new().unwrap();
        let (manager, runtime) = manager(&tmp);
        runtime.seed("persist:b", "b-cookie", "b-cache");
        let b = manager.partition_dir("b").unwrap();
        std::fs::create_dir_all(b.join("Local Storage")).unwrap();

        let result = manager.destroy_partition("a/../b").await;
        assert!(matches!(result, Err(SessionError::PathEscape { .. })));
        let result = manager.clear_storage_data("b/x").await;
        assert!(matches!(result, Err(SessionError::PathEscape { .. })));

        assert!(b.join("Local Storage").exists());
        assert_eq!(runtime.storage("persist:b"), vec!["b-cookie"]);
        assert!(runtime.calls().is_empty());
    }

    #[tokio::test]
    async fn test_runtime_failure_surfaces() {
        let tmp = TempDir::new().unwrap();
        let (manager, runtime) = manager(&tmp);
        runtime.fail_with("context crashed");

        let result = manager.clear_cache("s1").await;
        assert!(matches!(result, Err(SessionError::Runtime { .. })));
    }
}
