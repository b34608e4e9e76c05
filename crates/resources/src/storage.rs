use crate::ResourceError;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Storage collaborator: resolves a resource name to its raw bytes.
///
/// Called only by the master for synchronized resources, or by any node for
/// unsynchronized ones.
pub trait Storage {
    fn load_bytes(&self, name: &str) -> Result<Vec<u8>, ResourceError>;
}

/// File-system storage rooted at a resource directory.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Storage for FsStorage {
    fn load_bytes(&self, name: &str) -> Result<Vec<u8>, ResourceError> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(ResourceError::NotFound(name.to_string()));
        }
        Ok(std::fs::read(path)?)
    }
}

/// In-memory storage for tests and the cluster simulator.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.entries.insert(name.into(), data);
    }
}

impl Storage for MemoryStorage {
    fn load_bytes(&self, name: &str) -> Result<Vec<u8>, ResourceError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        storage.insert("tex_a", vec![1, 2, 3]);
        assert_eq!(storage.load_bytes("tex_a").unwrap(), vec![1, 2, 3]);
        assert!(matches!(
            storage.load_bytes("missing"),
            Err(ResourceError::NotFound(_))
        ));
    }

    #[test]
    fn fs_storage_reads_files() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("shader.glsl"), b"void main() {}").unwrap();

        let storage = FsStorage::new(tmp.path());
        assert_eq!(
            storage.load_bytes("shader.glsl").unwrap(),
            b"void main() {}"
        );
        assert!(matches!(
            storage.load_bytes("missing.glsl"),
            Err(ResourceError::NotFound(_))
        ));
    }
}
