use serde::{Deserialize, Serialize};

use graymesh_model::{Metadata, ServiceId};

/// Registry client configuration.
///
/// Supplied by the embedding process's configuration collaborator;
/// everything has a usable default so a partial config file still parses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryConfig {
    /// Registry namespace the instance registers and discovers in.
    pub group: String,
    /// Serve the last-known-good cache when the registry is unreachable.
    ///
    /// Disabled by default: discovery failures then yield empty lists.
    pub failure_tolerance: bool,
    /// Service this process registers as. Empty means registration and
    /// status operations become logged no-ops.
    pub service_id: ServiceId,
    /// Address this process advertises.
    pub address: String,
    /// Port this process advertises.
    pub port: u16,
    /// Metadata published at registration time (version tag, zone, ...).
    pub metadata: Metadata,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            group: "default".to_string(),
            failure_tolerance: false,
            service_id: String::new(),
            address: String::new(),
            port: 0,
            metadata: Metadata::new(),
        }
    }
}
