use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    error::{ModelError, ModelResult},
    strategy::ValueMatchStrategy,
};

/// Version a routing rule requires of eligible instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequiredVersion {
    /// Fixed version literal, e.g. `"v2"`.
    Literal(String),
    /// Resolve the version from the active traffic tag at selection time
    /// (key [`crate::TAG_VERSION_KEY`]), keeping a pinned chain on the
    /// version it first landed on.
    FollowTag,
}

/// What the routing engine returns when no candidate matches the rule.
///
/// This is a configuration choice supplied with the rule, not a
/// hardcoded engine default.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmptyMatchPolicy {
    /// Return the full unfiltered candidate set, disabling gray isolation
    /// for this call. Availability-first; matches registry behavior when
    /// no rule is in force.
    #[default]
    Degrade,
    /// Return an empty set; the caller sees no eligible instance.
    Isolate,
}

impl FromStr for EmptyMatchPolicy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degrade" | "all" => Ok(EmptyMatchPolicy::Degrade),
            "isolate" | "strict" => Ok(EmptyMatchPolicy::Isolate),
            other => Err(ModelError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Declarative gray-routing rule.
///
/// A rule says *when* it applies (a match strategy tested against one tag
/// key of the active traffic tag) and *what* it demands of instances
/// (a required version), plus the policy for an empty match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingRule {
    /// Tag key whose value gates this rule.
    ///
    /// `None` means the rule applies to every call unconditionally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_key: Option<String>,
    /// How `values` are tested against the tag value under `tag_key`.
    #[serde(default)]
    pub strategy: ValueMatchStrategy,
    /// Configured values the strategy tests against.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// Version eligible instances must carry.
    pub version: RequiredVersion,
    /// Policy applied when no instance survives the version filter.
    #[serde(default)]
    pub on_empty: EmptyMatchPolicy,
}

impl RoutingRule {
    /// Unconditional rule requiring a fixed version.
    pub fn require_version<V: Into<String>>(version: V) -> Self {
        Self {
            tag_key: None,
            strategy: ValueMatchStrategy::default(),
            values: Vec::new(),
            version: RequiredVersion::Literal(version.into()),
            on_empty: EmptyMatchPolicy::default(),
        }
    }

    /// Unconditional rule following the chain's pinned version tag.
    pub fn follow_tag() -> Self {
        Self {
            tag_key: None,
            strategy: ValueMatchStrategy::default(),
            values: Vec::new(),
            version: RequiredVersion::FollowTag,
            on_empty: EmptyMatchPolicy::default(),
        }
    }

    /// Set the empty-match policy (builder-style).
    pub fn with_policy(mut self, policy: EmptyMatchPolicy) -> Self {
        self.on_empty = policy;
        self
    }

    /// Gate the rule on a tag key and value set (builder-style).
    pub fn when_tag<K, I, V>(mut self, key: K, strategy: ValueMatchStrategy, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.tag_key = Some(key.into());
        self.strategy = strategy;
        self.values = values.into_iter().map(Into::into).collect();
        self
    }
}

/// Routing-rule list supplied by the configuration collaborator.
///
/// Rules are evaluated in order; the first one that applies to a call
/// governs its selection.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouteConfig {
    pub rules: Vec<RoutingRule>,
}

impl RouteConfig {
    /// Config with no rules; every call passes through unfiltered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule (builder-style).
    pub fn with_rule(mut self, rule: RoutingRule) -> Self {
        self.rules.push(rule);
        self
    }
}
