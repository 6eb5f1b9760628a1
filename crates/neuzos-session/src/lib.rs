//! NeuzOS Session Partitions
//!
//! Every session runs in its own persistent browsing context, named
//! `persist:<session id>`. Cookies, storage and cache never cross partitions.
//! The browsing-context runtime itself sits behind [`BrowsingContextRuntime`]
//! so the lifecycle rules here do not depend on a particular webview.

mod error;
mod manager;
mod partition;
mod runtime;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::SessionError;
pub use manager::PartitionedSessionManager;
pub use partition::{Partition, PARTITIONS_DIR_NAME, PARTITION_PREFIX};
pub use runtime::BrowsingContextRuntime;

pub type Result<T> = std::result::Result<T, SessionError>;
