use std::collections::BTreeSet;
use std::sync::Arc;

use graymesh_model::{
    EmptyMatchPolicy, Instance, RequiredVersion, RouteConfig, RoutingRule, TAG_VERSION_KEY,
    TrafficTag,
};
use tracing::{debug, instrument, trace};

use super::{
    InvokerStrategy, MetadataVersionStrategy, TargetVersionInvoker, VersionStrategy,
};

/// Result of one selection pass.
///
/// `instances` is the eligible subset (or the full candidate set when the
/// rule did not apply, or when the degrade policy fired). Tie-breaking
/// among them is the load balancer's job, not this engine's.
#[derive(Debug)]
pub struct Selection {
    /// Instances the caller may dispatch to.
    pub instances: Vec<Instance>,
    /// `true` when the empty-match degrade policy disabled gray isolation
    /// for this call.
    pub degraded: bool,
    /// Versions of candidates that failed the version filter.
    ///
    /// Diagnostic output; an empty set simply means every candidate
    /// matched (or the rule did not apply).
    pub rejected_versions: BTreeSet<String>,
}

impl Selection {
    fn passthrough(candidates: &[Instance]) -> Self {
        Self {
            instances: candidates.to_vec(),
            degraded: false,
            rejected_versions: BTreeSet::new(),
        }
    }

    /// Returns `true` if no instance survived.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Composes version derivation and eligibility into instance selection.
///
/// Strategies are injected as trait objects, so alternate version sources
/// (headers, zone metadata) plug in without touching call sites.
pub struct RoutingEngine {
    versions: Arc<dyn VersionStrategy>,
    invoker: Arc<dyn InvokerStrategy>,
}

impl Default for RoutingEngine {
    fn default() -> Self {
        Self {
            versions: Arc::new(MetadataVersionStrategy),
            invoker: Arc::new(TargetVersionInvoker),
        }
    }
}

impl RoutingEngine {
    /// Engine with the default metadata-version and exact-match strategies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the version strategy (builder-style).
    pub fn with_version_strategy(mut self, versions: Arc<dyn VersionStrategy>) -> Self {
        self.versions = versions;
        self
    }

    /// Replace the invoker strategy (builder-style).
    pub fn with_invoker(mut self, invoker: Arc<dyn InvokerStrategy>) -> Self {
        self.invoker = invoker;
        self
    }

    /// Returns `true` if `rule` applies to a call carrying `tag`.
    ///
    /// A rule without a tag key applies unconditionally. A gated rule
    /// applies when the tag's first value under the key satisfies the
    /// rule's match strategy; a chain with no such tag value is never
    /// gated in.
    pub fn rule_applies(&self, rule: &RoutingRule, tag: Option<&TrafficTag>) -> bool {
        let Some(key) = rule.tag_key.as_deref() else {
            return true;
        };
        match tag.and_then(|t| t.first_value(key)) {
            Some(value) => rule.strategy.is_match(&rule.values, value),
            None => false,
        }
    }

    /// Select the eligible subset of `candidates` under `rule`.
    ///
    /// Steps:
    /// 1. If the rule is gated on a tag and does not apply, pass the
    ///    candidates through untouched (no gray isolation for this call).
    /// 2. Resolve the effective required version: the rule's literal, or
    ///    the value carried under [`TAG_VERSION_KEY`] for `FollowTag`.
    /// 3. Filter candidates with the invoker strategy.
    /// 4. On an empty result, apply the rule's empty-match policy.
    ///
    /// An unmatched candidate set is a legitimate result, never an error.
    #[instrument(level = "debug", skip_all, fields(candidates = candidates.len()))]
    pub fn select(
        &self,
        candidates: &[Instance],
        rule: &RoutingRule,
        tag: Option<&TrafficTag>,
    ) -> Selection {
        if !self.rule_applies(rule, tag) {
            trace!("rule does not apply to this call, passing candidates through");
            return Selection::passthrough(candidates);
        }

        let required = match &rule.version {
            RequiredVersion::Literal(v) => Some(v.clone()),
            RequiredVersion::FollowTag => tag
                .and_then(|t| t.first_value(TAG_VERSION_KEY))
                .map(str::to_string),
        };

        let mut rejected = BTreeSet::new();
        let matched: Vec<Instance> = match required.as_deref() {
            Some(required) => candidates
                .iter()
                .filter(|c| {
                    self.invoker
                        .is_match(c, required, &mut rejected, self.versions.as_ref())
                })
                .cloned()
                .collect(),
            // FollowTag with no tag value: there is nothing to require,
            // so no candidate can match.
            None => {
                for c in candidates {
                    rejected.insert(self.versions.version_of(c));
                }
                Vec::new()
            }
        };

        if matched.is_empty() {
            return match rule.on_empty {
                EmptyMatchPolicy::Degrade => {
                    debug!(
                        required = required.as_deref().unwrap_or("<none>"),
                        rejected = ?rejected,
                        "no candidate matched, degrading to the full set"
                    );
                    Selection {
                        instances: candidates.to_vec(),
                        degraded: true,
                        rejected_versions: rejected,
                    }
                }
                EmptyMatchPolicy::Isolate => {
                    debug!(
                        required = required.as_deref().unwrap_or("<none>"),
                        rejected = ?rejected,
                        "no candidate matched, isolating strictly"
                    );
                    Selection {
                        instances: Vec::new(),
                        degraded: false,
                        rejected_versions: rejected,
                    }
                }
            };
        }

        trace!(matched = matched.len(), "version filter kept candidates");
        Selection {
            instances: matched,
            degraded: false,
            rejected_versions: rejected,
        }
    }

    /// Select under a configured rule list.
    ///
    /// The first rule that applies to the call governs selection; with no
    /// applicable rule (or an empty list) the candidates pass through
    /// untouched.
    pub fn route(
        &self,
        candidates: &[Instance],
        config: &RouteConfig,
        tag: Option<&TrafficTag>,
    ) -> Selection {
        match config.rules.iter().find(|r| self.rule_applies(r, tag)) {
            Some(rule) => self.select(candidates, rule, tag),
            None => Selection::passthrough(candidates),
        }
    }
}
