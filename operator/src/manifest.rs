//! Manifest is the output of resource synthesis, handed to whatever applies it to a cluster.
use std::collections::BTreeMap;

use k8s_openapi::{
    api::{apps::v1::Deployment, core::v1::Service, core::v1::ServiceAccount},
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};
use kube::Resource;
use serde::Serialize;

/// A single desired-state object.
#[derive(Serialize, Debug, PartialEq, Clone)]
#[serde(untagged)]
pub enum MtqResource {
    /// Identity of the component's pods.
    ServiceAccount(ServiceAccount),
    /// Network exposure of the component.
    Service(Service),
    /// Workload of the component.
    Deployment(Deployment),
}

impl MtqResource {
    /// Kind of the wrapped object.
    pub fn kind(&self) -> &'static str {
        match self {
            MtqResource::ServiceAccount(_) => <ServiceAccount as k8s_openapi::Resource>::KIND,
            MtqResource::Service(_) => <Service as k8s_openapi::Resource>::KIND,
            MtqResource::Deployment(_) => <Deployment as k8s_openapi::Resource>::KIND,
        }
    }

    /// Metadata of the wrapped object.
    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            MtqResource::ServiceAccount(account) => account.meta(),
            MtqResource::Service(service) => service.meta(),
            MtqResource::Deployment(deployment) => deployment.meta(),
        }
    }

    /// Name of the wrapped object.
    pub fn name(&self) -> Option<&str> {
        self.metadata().name.as_deref()
    }

    /// Labels of the wrapped object.
    pub fn labels(&self) -> Option<&BTreeMap<String, String>> {
        self.metadata().labels.as_ref()
    }
}

/// Render resources as a multi document YAML stream, in order.
pub fn to_yaml(resources: &[MtqResource]) -> Result<String, serde_yaml::Error> {
    let documents = resources
        .iter()
        .map(serde_yaml::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(documents.join("---\n"))
}
