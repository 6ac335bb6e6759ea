use std::collections::BTreeSet;

use graymesh_model::Instance;

use super::VersionStrategy;

/// Decides whether a candidate is eligible for a required version.
pub trait InvokerStrategy: Send + Sync {
    /// Strategy name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Returns `true` iff the candidate's derived version satisfies
    /// `required`.
    ///
    /// `rejected` accumulates the versions of candidates that did not
    /// match. It is a diagnostic output only and is never read as an
    /// input filter.
    fn is_match(
        &self,
        candidate: &Instance,
        required: &str,
        rejected: &mut BTreeSet<String>,
        versions: &dyn VersionStrategy,
    ) -> bool;
}

/// Exact-equality eligibility: the derived version must equal the
/// required version verbatim, no fuzzy matching.
pub struct TargetVersionInvoker;

impl InvokerStrategy for TargetVersionInvoker {
    fn name(&self) -> &'static str {
        "target-version"
    }

    fn is_match(
        &self,
        candidate: &Instance,
        required: &str,
        rejected: &mut BTreeSet<String>,
        versions: &dyn VersionStrategy,
    ) -> bool {
        let version = versions.version_of(candidate);
        if version == required {
            true
        } else {
            rejected.insert(version);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{InvokerStrategy, TargetVersionInvoker};
    use crate::routing::MetadataVersionStrategy;
    use graymesh_model::Instance;

    fn inst(version: &str) -> Instance {
        Instance::new("orders", "10.0.0.1", 8080).with_version(version)
    }

    #[test]
    fn matches_on_exact_version_only() {
        let mut rejected = BTreeSet::new();

        assert!(TargetVersionInvoker.is_match(
            &inst("v2"),
            "v2",
            &mut rejected,
            &MetadataVersionStrategy
        ));
        assert!(!TargetVersionInvoker.is_match(
            &inst("v2.1"),
            "v2",
            &mut rejected,
            &MetadataVersionStrategy
        ));
    }

    #[test]
    fn rejected_collects_only_non_matching_versions() {
        let mut rejected = BTreeSet::new();

        TargetVersionInvoker.is_match(&inst("v1"), "v2", &mut rejected, &MetadataVersionStrategy);
        TargetVersionInvoker.is_match(&inst("v2"), "v2", &mut rejected, &MetadataVersionStrategy);
        TargetVersionInvoker.is_match(&inst("v3"), "v2", &mut rejected, &MetadataVersionStrategy);

        assert_eq!(
            rejected.iter().map(String::as_str).collect::<Vec<_>>(),
            ["v1", "v3"]
        );
    }
}
