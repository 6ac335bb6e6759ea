//! Common model-level constants.
//!
//! Well-known string keys shared by the routing and discovery layers.
//! Keeping them here avoids scattering magic strings throughout the codebase.

/// Metadata key under which an instance publishes its release version.
///
/// `Instance::version()` reads this key; instances registered without it
/// are treated as [`DEFAULT_VERSION`].
pub const META_VERSION_KEY: &str = "version";

/// Version assigned to instances whose metadata carries no version entry.
pub const DEFAULT_VERSION: &str = "latest";

/// Tag key under which a call chain carries the version it is pinned to.
///
/// Rules configured with `RequiredVersion::FollowTag` resolve their
/// effective version from this key of the active [`crate::TrafficTag`].
pub const TAG_VERSION_KEY: &str = "gray-version";
