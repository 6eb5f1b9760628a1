//! Browsing-context runtime seam

use async_trait::async_trait;

use crate::partition::Partition;

/// The webview runtime that actually owns partition contexts.
///
/// Contexts are created lazily by the runtime on first reference, so both
/// operations must succeed on a partition that has never been used.
#[async_trait]
pub trait BrowsingContextRuntime: Send + Sync {
    /// Drop the HTTP cache of the partition.
    async fn clear_cache(&self, partition: &Partition) -> std::result::Result<(), String>;

    /// Drop cookies, local storage, IndexedDB and the rest of the
    /// partition's site data.
    async fn clear_storage_data(&self, partition: &Partition) -> std::result::Result<(), String>;
}
