//! Utils is shared builders and constants for the operator resources
pub mod env;
pub mod resource_requests;


use std::collections::BTreeMap;

use k8s_openapi::{
    api::{
        apps::v1::{Deployment, DeploymentSpec},
        core::v1::{
            Capabilities, Container, LocalObjectReference, PodSecurityContext, PodSpec,
            PodTemplateSpec, SeccompProfile, SecurityContext, Service, ServiceAccount,
            ServiceSpec,
        },
    },
    apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta},
};

use crate::labels::{managed_labels_extend, selector_labels};
use crate::placement::NodePlacement;

/// Builds the skeleton of resources shared by every operator component.
///
/// All resources created by the same builder carry the same common labels, extended by the
/// selector label of the component they belong to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceBuilder {
    common_labels: BTreeMap<String, String>,
}

impl Default for ResourceBuilder {
    fn default() -> Self {
        Self::new(&BTreeMap::new())
    }
}

impl ResourceBuilder {
    /// Create a builder whose common labels are the managed labels plus the operator labels.
    pub fn new(operator_labels: &BTreeMap<String, String>) -> Self {
        Self {
            common_labels: managed_labels_extend(operator_labels),
        }
    }

    /// Full label set of a component's resources.
    pub fn labels(&self, component: &str) -> BTreeMap<String, String> {
        let mut labels = self.common_labels.clone();
        labels.extend(selector_labels(component));
        labels
    }

    fn metadata(&self, name: &str) -> ObjectMeta {
        ObjectMeta {
            name: Some(name.to_owned()),
            labels: Some(self.labels(name)),
            ..Default::default()
        }
    }

    /// Create a service account named after the component.
    pub fn create_service_account(&self, name: &str) -> ServiceAccount {
        ServiceAccount {
            metadata: self.metadata(name),
            ..Default::default()
        }
    }

    /// Create a service selecting the pods of the named component.
    /// Ports and the service type come from `spec`, its selector is always replaced.
    pub fn create_service(&self, name: &str, spec: ServiceSpec) -> Service {
        Service {
            metadata: self.metadata(name),
            spec: Some(ServiceSpec {
                selector: Some(selector_labels(name)),
                ..spec
            }),
            ..Default::default()
        }
    }

    /// Create a deployment of the named component running the given pod under the service
    /// account. Containers, volumes and priority come from `pod`; pod security, pull secrets,
    /// service account and placement are set here.
    pub fn create_deployment(
        &self,
        name: &str,
        service_account_name: &str,
        image_pull_secrets: &[LocalObjectReference],
        replicas: i32,
        node_placement: Option<&NodePlacement>,
        pod: PodSpec,
    ) -> Deployment {
        let template = PodTemplateSpec {
            metadata: Some(ObjectMeta {
                labels: Some(self.labels(name)),
                ..Default::default()
            }),
            spec: Some(PodSpec {
                security_context: Some(PodSecurityContext {
                    run_as_non_root: Some(true),
                    ..Default::default()
                }),
                image_pull_secrets: (!image_pull_secrets.is_empty())
                    .then(|| image_pull_secrets.to_vec()),
                service_account_name: (!service_account_name.is_empty())
                    .then(|| service_account_name.to_owned()),
                ..pod
            }),
        };
        let template = match node_placement {
            Some(placement) => placement.apply_to_pod_template(template),
            None => template,
        };
        Deployment {
            metadata: self.metadata(name),
            spec: Some(DeploymentSpec {
                replicas: Some(replicas),
                selector: LabelSelector {
                    match_labels: Some(selector_labels(name)),
                    ..Default::default()
                },
                template,
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

/// Create a container running the image with the given log verbosity.
pub fn create_container(name: &str, image: &str, verbosity: &str, pull_policy: &str) -> Container {
    Container {
        name: name.to_owned(),
        image: Some(image.to_owned()),
        args: Some(vec![format!("-v={verbosity}")]),
        image_pull_policy: Some(pull_policy.to_owned()),
        termination_message_policy: Some("FallbackToLogsOnError".to_owned()),
        security_context: Some(restricted_security_context()),
        ..Default::default()
    }
}

// Satisfies the restricted pod security standard.
fn restricted_security_context() -> SecurityContext {
    SecurityContext {
        allow_privilege_escalation: Some(false),
        capabilities: Some(Capabilities {
            drop: Some(vec!["ALL".to_owned()]),
            ..Default::default()
        }),
        run_as_non_root: Some(true),
        seccomp_profile: Some(SeccompProfile {
            type_: "RuntimeDefault".to_owned(),
            ..Default::default()
        }),
        ..Default::default()
    }
}
