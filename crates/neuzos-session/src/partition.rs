//! Partition naming and on-disk location

use std::path::{Component, Path, PathBuf};

use crate::error::SessionError;
use crate::Result;

pub const PARTITION_PREFIX: &str = "persist:";

/// Directory under the user-data dir holding one subdirectory per partition.
pub const PARTITIONS_DIR_NAME: &str = "Partitions";

/// Isolated storage namespace backing one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    session_id: String,
}

impl Partition {
    pub fn for_session(session_id: &str) -> Result<Self> {
        if session_id.trim().is_empty() {
            return Err(SessionError::EmptySessionId);
        }

        Ok(Self {
            session_id: session_id.to_string(),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Runtime name of the partition, `persist:<session id>`.
    pub fn name(&self) -> String {
        format!("{}{}", PARTITION_PREFIX, self.session_id)
    }

    /// On-disk storage directory, a direct child of
    /// `<user_data_dir>/Partitions` named after the session id.
    ///
    /// Ids that are not exactly one plain path component (separators,
    /// `.`/`..`, drive or root prefixes) are refused, so two distinct ids
    /// never share or nest a directory.
    pub fn storage_dir(&self, user_data_dir: &Path) -> Result<PathBuf> {
        let root = normalize(&user_data_dir.join(PARTITIONS_DIR_NAME));
        let escape = || SessionError::PathEscape {
            session_id: self.session_id.clone(),
            root: root.clone(),
        };

        if self.session_id.contains(['/', '\\']) {
            return Err(escape());
        }
        let mut components = Path::new(&self.session_id).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(escape());
        }

        let dir = root.join(&self.session_id);
        if dir.parent() != Some(root.as_path()) {
            return Err(escape());
        }
        Ok(dir)
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", PARTITION_PREFIX, self.session_id)
    }
}

/// Lexical normalization; resolves `.` and `..` without touching the disk.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_name() {
        let partition = Partition::for_session("s1").unwrap();
        assert_eq!(partition.name(), "persist:s1");
        assert_eq!(partition.to_string(), "persist:s1");
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(matches!(
            Partition::for_session("  "),
            Err(SessionError::EmptySessionId)
        ));
    }

    #[test]
    fn test_distinct_sessions_never_share_a_directory() {
        let root = Path::new("/data/neuzos");
        let a = Partition::for_session("a").unwrap().storage_dir(root).unwrap();
        let b = Partition::for_session("b").unwrap().storage_dir(root).unwrap();
        assert_ne!(a, b);
        assert!(!a.starts_with(&b) && !b.starts_with(&a));
        assert_eq!(a, Path::new("/data/neuzos/Partitions/a"));
    }

    #[test]
    fn test_traversal_ids_rejected() {
        let root = Path::new("/data/neuzos");
        for id in ["..", "../..", "a/../..", "../Partitions", ".", "/etc"] {
            let result = Partition::for_session(id).unwrap().storage_dir(root);
            assert!(
                matches!(result, Err(SessionError::PathEscape { .. })),
                "{id} should be rejected"
            );
        }
    }

    #[test]
    fn test_ids_aliasing_another_partition_rejected() {
        let root = Path::new("/data/neuzos");
        for id in ["a/../b", "b/x", "b\\x", "./b", "b/"] {
            let result = Partition::for_session(id).unwrap().storage_dir(root);
            assert!(
                matches!(result, Err(SessionError::PathEscape { .. })),
                "{id} should be rejected"
            );
        }
    }

    #[test]
    fn test_dotted_id_is_its_own_directory() {
        let root = Path::new("/data/neuzos");
        let dir = Partition::for_session("main.alt")
            .unwrap()
            .storage_dir(root)
            .unwrap();
        assert_eq!(dir, Path::new("/data/neuzos/Partitions/main.alt"));
    }
}
