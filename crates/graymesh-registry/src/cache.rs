use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use graymesh_model::{Instance, ServiceId};

/// Last-known-good discovery snapshots, keyed by service id.
///
/// An explicit object with caller-controlled lifetime: the embedding
/// process creates one per registry and injects it into the client, so
/// independent registries (and isolated tests) never share state.
///
/// Entries follow last-successful-write-wins and never expire on their
/// own; only the next successful fresh query overwrites them. Writes are
/// whole-value replaces per service id, so a failing concurrent refresh
/// can never corrupt a previously good snapshot.
///
/// Cloning is cheap and shares the underlying storage.
#[derive(Clone, Default)]
pub struct ServiceCache {
    inner: Arc<CacheInner>,
}

#[derive(Default)]
struct CacheInner {
    instances: RwLock<HashMap<ServiceId, Vec<Instance>>>,
    services: RwLock<BTreeSet<ServiceId>>,
}

impl ServiceCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot for `service_id` with `instances`.
    ///
    /// An empty fresh list still overwrites: a registry that really has
    /// no instances beats a stale non-empty snapshot.
    pub fn put_instances<S: Into<ServiceId>>(&self, service_id: S, instances: Vec<Instance>) {
        write(&self.inner.instances).insert(service_id.into(), instances);
    }

    /// Cached snapshot for `service_id`; empty if never populated.
    pub fn instances(&self, service_id: &str) -> Vec<Instance> {
        read(&self.inner.instances)
            .get(service_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace the known service-id universe.
    pub fn put_services<I, S>(&self, services: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<ServiceId>,
    {
        *write(&self.inner.services) = services.into_iter().map(Into::into).collect();
    }

    /// Cached service-id universe, sorted; empty if never populated.
    pub fn services(&self) -> Vec<ServiceId> {
        read(&self.inner.services).iter().cloned().collect()
    }
}

// A poisoned lock only means a writer panicked mid-replace of a value
// that is swapped wholesale; the stored data is still coherent.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}
