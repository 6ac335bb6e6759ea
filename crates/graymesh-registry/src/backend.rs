use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use graymesh_model::{Instance, InstanceStatus, Metadata, ServiceId};

use crate::{RegistryConfig, RegistryResult};

/// Identity this process presents to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub service_id: ServiceId,
    pub address: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Registration {
    /// Build a registration from client configuration.
    ///
    /// Returns `None` when the config carries no service identity, which
    /// turns registration-facing operations into logged no-ops.
    pub fn from_config(cfg: &RegistryConfig) -> Option<Self> {
        if cfg.service_id.trim().is_empty() {
            return None;
        }
        Some(Self {
            service_id: cfg.service_id.clone(),
            address: cfg.address.clone(),
            port: cfg.port,
            metadata: cfg.metadata.clone(),
        })
    }

    /// `address:port` rendering used for matching registry responses.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// Seam for the concrete registry SDK.
///
/// The remote protocol is opaque to this crate: each call either succeeds
/// with data or fails with a typed [`crate::RegistryError`]. Calls are
/// bounded by the SDK's own timeouts; a timeout surfaces as an ordinary
/// catchable failure. Implementations must tolerate concurrent callers.
#[async_trait]
pub trait RegistryBackend: Send + Sync {
    /// Backend name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Register `registration` under `group`. Idempotent.
    async fn register(&self, group: &str, registration: &Registration) -> RegistryResult<()>;

    /// Remove `registration` from `group`. Idempotent.
    async fn deregister(&self, group: &str, registration: &Registration) -> RegistryResult<()>;

    /// All instances of `service_id` within `group`.
    async fn query_instances(
        &self,
        group: &str,
        service_id: &str,
    ) -> RegistryResult<Vec<Instance>>;

    /// All service ids known within `group`.
    async fn query_services(&self, group: &str) -> RegistryResult<Vec<ServiceId>>;

    /// Push a liveness status for `registration`.
    ///
    /// Callers only ever pass [`InstanceStatus::Up`] or
    /// [`InstanceStatus::Down`]; the client validates before calling.
    async fn update_status(
        &self,
        group: &str,
        registration: &Registration,
        status: InstanceStatus,
    ) -> RegistryResult<()>;
}
