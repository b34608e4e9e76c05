use crate::{PendingResourceQueue, ResourceError, ResourceKind, ResourceRequest, Storage};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Opaque handle to a backend-side GPU object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendHandle(pub u64);

/// Rendering-backend seam for resource construction. The core never issues
/// draw calls; creating GPU objects from raw bytes is the only backend
/// operation the managers need.
pub trait GpuFactory {
    fn create_program(&mut self, name: &str, data: &[u8]) -> Result<BackendHandle, ResourceError>;
    fn create_texture(&mut self, name: &str, data: &[u8]) -> Result<BackendHandle, ResourceError>;
    fn create_mesh(&mut self, name: &str, data: &[u8]) -> Result<BackendHandle, ResourceError>;

    fn create(
        &mut self,
        kind: ResourceKind,
        name: &str,
        data: &[u8],
    ) -> Result<BackendHandle, ResourceError> {
        match kind {
            ResourceKind::GpuProgram => self.create_program(name, data),
            ResourceKind::Texture => self.create_texture(name, data),
            ResourceKind::Mesh => self.create_mesh(name, data),
        }
    }
}

/// Factory handing out sequential handles without a GPU. Used by the cluster
/// simulator and tests; rejects empty payloads so construction failures can
/// be exercised.
#[derive(Debug, Default)]
pub struct NullGpuFactory {
    next: u64,
}

impl NullGpuFactory {
    pub fn new() -> Self {
        Self::default()
    }

    fn create_any(&mut self, name: &str, data: &[u8]) -> Result<BackendHandle, ResourceError> {
        if data.is_empty() {
            return Err(ResourceError::Construction {
                name: name.to_string(),
                reason: "empty payload".into(),
            });
        }
        self.next += 1;
        Ok(BackendHandle(self.next))
    }
}

impl GpuFactory for NullGpuFactory {
    fn create_program(&mut self, name: &str, data: &[u8]) -> Result<BackendHandle, ResourceError> {
        self.create_any(name, data)
    }
    fn create_texture(&mut self, name: &str, data: &[u8]) -> Result<BackendHandle, ResourceError> {
        self.create_any(name, data)
    }
    fn create_mesh(&mut self, name: &str, data: &[u8]) -> Result<BackendHandle, ResourceError> {
        self.create_any(name, data)
    }
}

/// A named GPU resource.
///
/// `handle` is `None` when construction failed; the resource then stays in
/// the registry as a poisoned entry so repeated uses fail fast instead of
/// retrying or silently drawing nothing.
#[derive(Debug)]
pub struct Resource {
    name: String,
    kind: ResourceKind,
    synchronized: bool,
    handle: Option<BackendHandle>,
    /// Hex sha256 of the source bytes; identical across the cluster for
    /// synchronized resources.
    digest: String,
}

impl Resource {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn is_synchronized(&self) -> bool {
        self.synchronized
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// The backend handle, or `Unusable` for a poisoned resource.
    pub fn handle(&self) -> Result<BackendHandle, ResourceError> {
        self.handle
            .ok_or_else(|| ResourceError::Unusable(self.name.clone()))
    }
}

/// Name-keyed registry with at-most-one-instance-per-name semantics.
///
/// The manager is the sole owner; requesting an existing name returns the
/// shared instance. Eviction is not supported.
#[derive(Debug)]
pub struct ResourceManager {
    kind: ResourceKind,
    entries: BTreeMap<String, Arc<Resource>>,
}

impl ResourceManager {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an already-created resource.
    pub fn get(&self, name: &str) -> Option<Arc<Resource>> {
        self.entries.get(name).cloned()
    }

    /// Unsynchronized path: load from this node's local storage and construct
    /// the backend object. Only valid when every node carries an identical
    /// local copy (baked-in assets).
    pub fn get_local(
        &mut self,
        name: &str,
        storage: &dyn Storage,
        factory: &mut dyn GpuFactory,
    ) -> Result<Arc<Resource>, ResourceError> {
        if let Some(existing) = self.entries.get(name) {
            return existing.handle().map(|_| Arc::clone(existing));
        }
        let data = storage.load_bytes(name)?;
        self.construct(name, &data, false, factory)
    }

    /// Master half of the synchronized path: load the bytes once, realize the
    /// master-side object and queue the payload for broadcast to the slaves.
    pub fn request_synchronized(
        &mut self,
        name: &str,
        storage: &dyn Storage,
        factory: &mut dyn GpuFactory,
        queue: &PendingResourceQueue,
    ) -> Result<Arc<Resource>, ResourceError> {
        if let Some(existing) = self.entries.get(name) {
            return existing.handle().map(|_| Arc::clone(existing));
        }
        let data = storage.load_bytes(name)?;
        queue.enqueue(ResourceRequest {
            kind: self.kind,
            name: name.to_string(),
            data: data.clone(),
        });
        debug!(name, kind = ?self.kind, bytes = data.len(), "queued synchronized resource");
        self.construct(name, &data, true, factory)
    }

    /// Slave half of the synchronized path: construct from the payload bytes
    /// shipped in the snapshot. Never touches storage.
    pub fn create_from_bytes(
        &mut self,
        name: &str,
        data: &[u8],
        factory: &mut dyn GpuFactory,
    ) -> Result<Arc<Resource>, ResourceError> {
        if let Some(existing) = self.entries.get(name) {
            return existing.handle().map(|_| Arc::clone(existing));
        }
        self.construct(name, data, true, factory)
    }

    fn construct(
        &mut self,
        name: &str,
        data: &[u8],
        synchronized: bool,
        factory: &mut dyn GpuFactory,
    ) -> Result<Arc<Resource>, ResourceError> {
        let digest = sha256_hex(data);
        match factory.create(self.kind, name, data) {
            Ok(handle) => {
                let resource = Arc::new(Resource {
                    name: name.to_string(),
                    kind: self.kind,
                    synchronized,
                    handle: Some(handle),
                    digest,
                });
                self.entries.insert(name.to_string(), Arc::clone(&resource));
                Ok(resource)
            }
            Err(err) => {
                warn!(name, kind = ?self.kind, %err, "resource construction failed");
                // Poisoned entry: later lookups fail fast.
                self.entries.insert(
                    name.to_string(),
                    Arc::new(Resource {
                        name: name.to_string(),
                        kind: self.kind,
                        synchronized,
                        handle: None,
                        digest,
                    }),
                );
                Err(err)
            }
        }
    }
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;

    fn setup() -> (ResourceManager, MemoryStorage, NullGpuFactory) {
        let mut storage = MemoryStorage::new();
        storage.insert("tex_a", vec![0x01, 0x02, 0x03]);
        storage.insert("tex_b", vec![0x04]);
        (
            ResourceManager::new(ResourceKind::Texture),
            storage,
            NullGpuFactory::new(),
        )
    }

    #[test]
    fn same_name_returns_same_instance() {
        let (mut mgr, storage, mut factory) = setup();
        let a1 = mgr.get_local("tex_a", &storage, &mut factory).unwrap();
        let a2 = mgr.get_local("tex_a", &storage, &mut factory).unwrap();
        assert!(Arc::ptr_eq(&a1, &a2));
        assert_eq!(mgr.len(), 1);
    }

    #[test]
    fn different_names_are_distinct() {
        let (mut mgr, storage, mut factory) = setup();
        let a = mgr.get_local("tex_a", &storage, &mut factory).unwrap();
        let b = mgr.get_local("tex_b", &storage, &mut factory).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_ne!(a.handle().unwrap(), b.handle().unwrap());
    }

    #[test]
    fn missing_resource_fails_at_first_use() {
        let (mut mgr, storage, mut factory) = setup();
        assert!(matches!(
            mgr.get_local("missing", &storage, &mut factory),
            Err(ResourceError::NotFound(_))
        ));
        assert!(mgr.get("missing").is_none());
    }

    #[test]
    fn request_synchronized_queues_payload() {
        let (mut mgr, storage, mut factory) = setup();
        let queue = PendingResourceQueue::new();

        let res = mgr
            .request_synchronized("tex_a", &storage, &mut factory, &queue)
            .unwrap();
        assert!(res.is_synchronized());

        let pending = queue.drain();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "tex_a");
        assert_eq!(pending[0].data, vec![0x01, 0x02, 0x03]);
    }

    #[test]
    fn create_from_bytes_skips_storage() {
        let mut mgr = ResourceManager::new(ResourceKind::Texture);
        let mut factory = NullGpuFactory::new();
        let res = mgr
            .create_from_bytes("tex_a", &[0x01, 0x02, 0x03], &mut factory)
            .unwrap();
        assert!(res.handle().is_ok());
    }

    #[test]
    fn master_and_slave_digests_match() {
        let (mut mgr_master, storage, mut factory_master) = setup();
        let queue = PendingResourceQueue::new();
        let master = mgr_master
            .request_synchronized("tex_a", &storage, &mut factory_master, &queue)
            .unwrap();

        let shipped = queue.drain().remove(0);
        let mut mgr_slave = ResourceManager::new(ResourceKind::Texture);
        let mut factory_slave = NullGpuFactory::new();
        let slave = mgr_slave
            .create_from_bytes(&shipped.name, &shipped.data, &mut factory_slave)
            .unwrap();

        assert_eq!(master.digest(), slave.digest());
    }

    #[test]
    fn failed_construction_poisons_entry() {
        let mut mgr = ResourceManager::new(ResourceKind::Texture);
        let mut factory = NullGpuFactory::new();

        // Empty payload makes the null factory fail.
        assert!(matches!(
            mgr.create_from_bytes("broken", &[], &mut factory),
            Err(ResourceError::Construction { .. })
        ));

        // The entry exists but fails fast on use.
        let poisoned = mgr.get("broken").unwrap();
        assert!(matches!(
            poisoned.handle(),
            Err(ResourceError::Unusable(_))
        ));

        // A later create attempt also fails fast instead of retrying.
        assert!(matches!(
            mgr.create_from_bytes("broken", &[1], &mut factory),
            Err(ResourceError::Unusable(_))
        ));
    }
}
