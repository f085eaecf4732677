//! Node placement is handed through to pod specs untouched.
use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Affinity, PodSpec, PodTemplateSpec, Toleration};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Describes where infrastructure pods may be scheduled.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodePlacement {
    /// Labels a node must carry for the pod to be scheduled on it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,
    /// Affinity scheduling rules for the pod.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<Affinity>,
    /// Taints the pod tolerates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerations: Option<Vec<Toleration>>,
}

impl NodePlacement {
    /// Replace the scheduling fields of the pod template with this placement.
    pub fn apply_to_pod_template(&self, pod_template: PodTemplateSpec) -> PodTemplateSpec {
        PodTemplateSpec {
            spec: pod_template.spec.map(|spec| PodSpec {
                node_selector: self.node_selector.clone(),
                affinity: self.affinity.clone(),
                tolerations: self.tolerations.clone(),
                ..spec
            }),
            ..pod_template
        }
    }
}
