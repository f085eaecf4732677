//! Environment variables whose value is either known up front or resolved by the kubelet.
use k8s_openapi::api::core::v1::{EnvVar, EnvVarSource, ObjectFieldSelector};

/// Value of a container environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvValue {
    /// Value known at synthesis time.
    Literal(String),
    /// Value resolved by the kubelet from the named label of the running pod.
    PodLabel(&'static str),
}

/// A single container environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    /// Variable name as seen by the container.
    pub name: &'static str,
    /// Where the value comes from.
    pub value: EnvValue,
}

impl EnvEntry {
    /// Variable with a fixed value.
    pub fn literal(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: EnvValue::Literal(value.into()),
        }
    }

    /// Variable exposing a label of the pod through the downward API.
    pub fn pod_label(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            value: EnvValue::PodLabel(label),
        }
    }
}

impl From<EnvEntry> for EnvVar {
    fn from(entry: EnvEntry) -> Self {
        match entry.value {
            EnvValue::Literal(value) => EnvVar {
                name: entry.name.to_owned(),
                value: Some(value),
                ..Default::default()
            },
            EnvValue::PodLabel(label) => EnvVar {
                name: entry.name.to_owned(),
                value_from: Some(EnvVarSource {
                    field_ref: Some(ObjectFieldSelector {
                        api_version: Some("v1".to_owned()),
                        field_path: format!("metadata.labels['{label}']"),
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
        }
    }
}
