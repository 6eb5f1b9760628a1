//! In-memory browsing-context runtime for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::partition::Partition;
use crate::runtime::BrowsingContextRuntime;

#[derive(Default)]
struct PartitionData {
    storage: Vec<String>,
    cache: Vec<String>,
}

/// Records every call and keeps fake site data per partition name.
#[derive(Default)]
pub struct MemoryContexts {
    partitions: Mutex<HashMap<String, PartitionData>>,
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<String>>,
}

impl MemoryContexts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, partition: &str, storage: &str, cache: &str) {
        let mut partitions = self.partitions.lock();
        let data = partitions.entry(partition.to_string()).or_default();
        data.storage.push(storage.to_string());
        data.cache.push(cache.to_string());
    }

    pub fn storage(&self, partition: &str) -> Vec<String> {
        self.partitions
            .lock()
            .get(partition)
            .map(|d| d.storage.clone())
            .unwrap_or_default()
    }

    pub fn cache(&self, partition: &str) -> Vec<String> {
        self.partitions
            .lock()
            .get(partition)
            .map(|d| d.cache.clone())
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Make every following call fail with `reason`.
    pub fn fail_with(&self, reason: &str) {
        *self.failure.lock() = Some(reason.to_string());
    }

    fn record(&self, call: &str, partition: &Partition) -> Result<(), String> {
        self.calls.lock().push(format!("{} {}", call, partition.name()));
        match self.failure.lock().clone() {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BrowsingContextRuntime for MemoryContexts {
    async fn clear_cache(&self, partition: &Partition) -> Result<(), String> {
        self.record("clear_cache", partition)?;
        if let Some(data) = self.partitions.lock().get_mut(&partition.name()) {
            data.cache.clear();
        }
        Ok(())
    }

    async fn clear_storage_data(&self, partition: &Partition) -> Result<(), String> {
        self.record("clear_storage", partition)?;
        if let Some(data) = self.partitions.lock().get_mut(&partition.name()) {
            data.storage.clear();
        }
        Ok(())
    }
}
