use graymesh_model::Instance;

/// Derives the release version of a candidate instance.
///
/// Implementations must be total: an instance with no version information
/// yields a defined default, never a failure.
pub trait VersionStrategy: Send + Sync {
    /// Strategy name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Version of the given candidate.
    fn version_of(&self, candidate: &Instance) -> String;
}

/// Default strategy reading the version from instance metadata.
///
/// Instances registered without a version entry report
/// [`graymesh_model::DEFAULT_VERSION`].
pub struct MetadataVersionStrategy;

impl VersionStrategy for MetadataVersionStrategy {
    fn name(&self) -> &'static str {
        "metadata"
    }

    fn version_of(&self, candidate: &Instance) -> String {
        candidate.version().to_string()
    }
}
