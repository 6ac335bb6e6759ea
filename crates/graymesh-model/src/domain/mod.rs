mod metadata;
pub use metadata::Metadata;

mod constants;
pub use constants::{DEFAULT_VERSION, META_VERSION_KEY, TAG_VERSION_KEY};

/// Logical identifier of a service in the registry.
///
/// Instances belong to exactly one service id; the discovery cache and the
/// routing engine are both keyed by it.
pub type ServiceId = String;
