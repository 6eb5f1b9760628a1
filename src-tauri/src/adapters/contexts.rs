use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use neuzos_core::session::{BrowsingContextRuntime, Partition};

/// Chromium/WebKit cache directories inside a profile.
const CACHE_DIR_NAMES: &[&str] = &[
    "Cache",
    "Code Cache",
    "GPUCache",
    "DawnCache",
    "GrShaderCache",
    "ShaderCache",
    "CacheStorage",
    "WebKitCache",
];

/// Partition contexts backed by per-session webview data directories.
pub struct TauriBrowsingContexts {
    user_data_dir: PathBuf,
}

impl TauriBrowsingContexts {
    pub fn new(user_data_dir: PathBuf) -> Self {
        Self { user_data_dir }
    }

    fn dir(&self, partition: &Partition) -> Result<PathBuf, String> {
        partition
            .storage_dir(&self.user_data_dir)
            .map_err(|e| e.to_string())
    }
}

async fn remove_cache_dirs(root: &Path) -> std::io::Result<usize> {
    let mut removed = 0;
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            if CACHE_DIR_NAMES.iter().any(|c| name.to_str() == Some(*c)) {
                tokio::fs::remove_dir_all(entry.path()).await?;
                removed += 1;
            } else {
                stack.push(entry.path());
            }
        }
    }

    Ok(removed)
}

#[async_trait]
impl BrowsingContextRuntime for TauriBrowsingContexts {
    async fn clear_cache(&self, partition: &Partition) -> Result<(), String> {
        let dir = self.dir(partition)?;
        let removed = remove_cache_dirs(&dir).await.map_err(|e| e.to_string())?;
        tracing::debug!(partition = %partition, removed, "Removed cache directories");
        Ok(())
    }

    async fn clear_storage_data(&self, partition: &Partition) -> Result<(), String> {
        let dir = self.dir(partition)?;

        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.to_string()),
        }
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seed(root: &Path, files: &[&str]) {
        for file in files {
            let path = root.join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, b"x").unwrap();
        }
    }

    #[tokio::test]
    async fn test_clear_cache_keeps_site_data() {
        let dir = TempDir::new().unwrap();
        let contexts = TauriBrowsingContexts::new(dir.path().to_path_buf());
        let partition = Partition::for_session("alpha").unwrap();
        let profile = partition.storage_dir(dir.path()).unwrap();
        seed(
            &profile,
            &[
                "EBWebView/Default/Cache/data_0",
                "EBWebView/Default/Code Cache/js/index",
                "EBWebView/Default/Local Storage/leveldb/000003.log",
                "EBWebView/Default/Cookies",
            ],
        );

        contexts.clear_cache(&partition).await.unwrap();

        assert!(!profile.join("EBWebView/Default/Cache").exists());
        assert!(!profile.join("EBWebView/Default/Code Cache").exists());
        assert!(profile.join("EBWebView/Default/Cookies").exists());
        assert!(profile
            .join("EBWebView/Default/Local Storage/leveldb/000003.log")
            .exists());
    }

    #[tokio::test]
    async fn test_clear_storage_empties_partition() {
        let dir = TempDir::new().unwrap();
        let contexts = TauriBrowsingContexts::new(dir.path().to_path_buf());
        let partition = Partition::for_session("alpha").unwrap();
        let profile = partition.storage_dir(dir.path()).unwrap();
        seed(&profile, &["EBWebView/Default/Cookies"]);

        contexts.clear_storage_data(&partition).await.unwrap();

        assert!(profile.is_dir());
        assert_eq!(std::fs::read_dir(&profile).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_unused_partition_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let contexts = TauriBrowsingContexts::new(dir.path().to_path_buf());
        let partition = Partition::for_session("never-started").unwrap();

        contexts.clear_cache(&partition).await.unwrap();
        contexts.clear_storage_data(&partition).await.unwrap();
    }
}
