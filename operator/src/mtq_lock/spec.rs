//! Place all configuration types into a single module so they can be used as a lightweight dependency
use std::{fmt, str::FromStr};

use k8s_openapi::api::core::v1::LocalObjectReference;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::placement::NodePlacement;

/// Deployment parameters of the mtq-lock component.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MtqLockConfig {
    /// Container image of the lock server.
    pub image: String,
    /// Namespace KubeVirt is installed into.
    pub namespace: String,
    /// Pull policy of the image.
    #[serde(default)]
    pub pull_policy: PullPolicy,
    /// Secrets used to pull the image, in order.
    #[serde(default)]
    pub image_pull_secrets: Vec<LocalObjectReference>,
    /// Priority class of the pod. Empty is the same as unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_class_name: Option<String>,
    /// Log verbosity passed to the server.
    pub verbosity: String,
    /// Where the pod may be scheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infra_node_placement: Option<NodePlacement>,
}

impl MtqLockConfig {
    /// Priority class if one is set and not empty.
    pub fn priority_class(&self) -> Option<&str> {
        self.priority_class_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

/// PullPolicy is the discrete set of image pull policies.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone, Copy, JsonSchema)]
pub enum PullPolicy {
    /// Always pull the image.
    Always,
    /// Pull the image only if it is missing on the node (default).
    #[default]
    IfNotPresent,
    /// Never pull the image.
    Never,
}

impl PullPolicy {
    /// Returns the policy as spelled in container specs
    pub fn as_str(&self) -> &'static str {
        match self {
            PullPolicy::Always => "Always",
            PullPolicy::IfNotPresent => "IfNotPresent",
            PullPolicy::Never => "Never",
        }
    }
}

impl fmt::Display for PullPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The string is not a known image pull policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown image pull policy {0:?}, expected one of Always, IfNotPresent, Never")]
pub struct ParsePullPolicyError(String);

impl FromStr for PullPolicy {
    type Err = ParsePullPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Always" => Ok(PullPolicy::Always),
            "IfNotPresent" => Ok(PullPolicy::IfNotPresent),
            "Never" => Ok(PullPolicy::Never),
            other => Err(ParsePullPolicyError(other.to_owned())),
        }
    }
}
