use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    domain::{DEFAULT_VERSION, META_VERSION_KEY, Metadata, ServiceId},
    error::{ModelError, ModelResult},
};

/// Read-only snapshot of a registered service endpoint.
///
/// Instances are created from registry responses, consumed per call and
/// discarded; only the service cache retains a snapshot across calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Service this endpoint belongs to.
    pub service_id: ServiceId,
    /// Host address (ip or name).
    pub address: String,
    /// Listening port.
    pub port: u16,
    /// Whether the registry considers this endpoint able to take traffic.
    pub enabled: bool,
    /// Free-form metadata published at registration time.
    ///
    /// The routing layer reads the release version from
    /// [`META_VERSION_KEY`]; everything else is passed through untouched.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Instance {
    /// Create an enabled instance with the given coordinates.
    pub fn new<S, A>(service_id: S, address: A, port: u16) -> Self
    where
        S: Into<ServiceId>,
        A: Into<String>,
    {
        Self {
            service_id: service_id.into(),
            address: address.into(),
            port,
            enabled: true,
            metadata: Metadata::new(),
        }
    }

    /// Attach a metadata entry (builder-style).
    pub fn with_meta<K, V>(mut self, key: K, val: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.metadata.insert(key, val);
        self
    }

    /// Attach a release version under [`META_VERSION_KEY`] (builder-style).
    pub fn with_version<V: Into<String>>(self, version: V) -> Self {
        self.with_meta(META_VERSION_KEY, version)
    }

    /// Release version of this instance.
    ///
    /// Instances registered without a version entry report
    /// [`DEFAULT_VERSION`]; absence is never an error.
    pub fn version(&self) -> &str {
        self.metadata.get(META_VERSION_KEY).unwrap_or(DEFAULT_VERSION)
    }

    /// `address:port` rendering used for endpoint comparison and logs.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// Liveness of an instance as seen by (or pushed to) the registry.
///
/// Transitions follow the registry lifecycle:
/// `Unregistered` → register → `Up` → status update → `Down`/`Up` →
/// deregister → `Unregistered`. A failed remote call leaves no local
/// state change; this layer tracks nothing beyond the attempted effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstanceStatus {
    /// Registered and taking traffic.
    Up,
    /// Registered but administratively removed from traffic.
    Down,
    /// Not present in the registry response, or the registry is unreachable.
    Unknown,
    /// Never registered, or already deregistered.
    Unregistered,
}

impl InstanceStatus {
    /// Canonical uppercase rendering, matching registry wire values.
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Up => "UP",
            InstanceStatus::Down => "DOWN",
            InstanceStatus::Unknown => "UNKNOWN",
            InstanceStatus::Unregistered => "UNREGISTERED",
        }
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstanceStatus {
    type Err = ModelError;

    /// Only `UP` and `DOWN` (case-insensitive) are accepted from callers;
    /// `Unknown` and `Unregistered` are derived states, never an input.
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UP" => Ok(InstanceStatus::Up),
            "DOWN" => Ok(InstanceStatus::Down),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Instance, InstanceStatus};
    use crate::domain::DEFAULT_VERSION;

    #[test]
    fn version_reads_metadata_key() {
        let inst = Instance::new("orders", "10.0.0.1", 8080).with_version("v2");
        assert_eq!(inst.version(), "v2");
    }

    #[test]
    fn version_defaults_when_metadata_missing() {
        let inst = Instance::new("orders", "10.0.0.1", 8080);
        assert_eq!(inst.version(), DEFAULT_VERSION);
    }

    #[test]
    fn endpoint_joins_address_and_port() {
        let inst = Instance::new("orders", "10.0.0.1", 8080);
        assert_eq!(inst.endpoint(), "10.0.0.1:8080");
    }

    #[test]
    fn status_parses_up_down_case_insensitive() {
        for s in ["up", "UP", "Up"] {
            assert_eq!(s.parse::<InstanceStatus>().unwrap(), InstanceStatus::Up);
        }
        for s in ["down", "DOWN", "Down"] {
            assert_eq!(s.parse::<InstanceStatus>().unwrap(), InstanceStatus::Down);
        }
    }

    #[test]
    fn status_rejects_everything_else() {
        for s in ["", "maybe", "unknown", "unregistered", "STARTING"] {
            assert!(
                s.parse::<InstanceStatus>().is_err(),
                "expected error for status {s:?}"
            );
        }
    }

    #[test]
    fn serde_uses_uppercase_wire_values() {
        let json = serde_json::to_string(&InstanceStatus::Up).unwrap();
        assert_eq!(json, r#""UP""#);
    }

    #[test]
    fn instance_serde_roundtrip() {
        let inst = Instance::new("orders", "10.0.0.1", 8080).with_version("v1");
        let json = serde_json::to_string(&inst).unwrap();
        let back: Instance = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inst);
    }
}
