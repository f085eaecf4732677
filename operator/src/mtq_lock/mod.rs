//! The mtq-lock component serves the admission webhook that locks namespaces while quotas are
//! being updated. This module synthesizes the desired state of its resources.

// Export all spec types
mod spec;
pub use spec::*;

pub(crate) mod deployment;
pub(crate) mod service;

use k8s_openapi::api::core::v1::ServiceAccount;

use crate::{
    error::ConfigError,
    manifest::MtqResource,
    utils::{resource_requests::ResourceRequestsConfig, ResourceBuilder},
};

/// Name shared by all resources of the component.
pub const MTQ_LOCK_RESOURCE_NAME: &str = "mtq-lock";
/// Secret holding the serving certificate, rotated outside of this module.
pub const MTQ_LOCK_SERVER_CERT_SECRET: &str = "mtq-lock-server-cert";
/// Port exposed by the service.
pub const MTQ_LOCK_SERVICE_PORT: i32 = 443;
/// Port the lock server listens on.
pub const MTQ_LOCK_CONTAINER_PORT: i32 = 8443;

const MTQ_LOCK_CPU_REQUEST: &str = "10m";
const MTQ_LOCK_MEMORY_REQUEST: &str = "50Mi";

/// Produces the resources of the mtq-lock component from its configuration.
///
/// The factory is immutable; [`ResourceFactory::build`] allocates fresh resources on every call
/// and may be shared freely between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceFactory {
    builder: ResourceBuilder,
    requests: ResourceRequestsConfig,
}

impl ResourceFactory {
    /// Create a factory labelling resources with the default managed labels.
    ///
    /// Fails only if the built in resource requests are malformed.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_builder(ResourceBuilder::default())
    }

    /// Create a factory labelling resources through the given builder.
    pub fn with_builder(builder: ResourceBuilder) -> Result<Self, ConfigError> {
        Ok(Self {
            builder,
            requests: ResourceRequestsConfig::parse(
                MTQ_LOCK_CPU_REQUEST,
                MTQ_LOCK_MEMORY_REQUEST,
            )?,
        })
    }

    /// Resources of the component, in apply order: service account, service, deployment.
    pub fn build(&self, config: &MtqLockConfig) -> Vec<MtqResource> {
        vec![
            MtqResource::ServiceAccount(service_account(&self.builder)),
            MtqResource::Service(service::service(&self.builder)),
            MtqResource::Deployment(deployment::deployment(
                &self.builder,
                &self.requests,
                config,
            )),
        ]
    }
}

/// Identity the lock server pods run as.
pub fn service_account(builder: &ResourceBuilder) -> ServiceAccount {
    builder.create_service_account(MTQ_LOCK_RESOURCE_NAME)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use k8s_openapi::{
        api::{
            apps::v1::Deployment,
            core::v1::{LocalObjectReference, PodSpec, Toleration},
        },
        apimachinery::pkg::{api::resource::Quantity, util::intstr::IntOrString},
    };

    use super::*;
    use crate::{
        labels::{APP_KUBERNETES_VERSION_LABEL, MTQ_LABEL},
        placement::NodePlacement,
    };

    fn factory() -> ResourceFactory {
        ResourceFactory::new().expect("built in quantities are valid")
    }

    fn default_config() -> MtqLockConfig {
        MtqLockConfig {
            image: "quay.io/x/mtq-lock:v1".to_owned(),
            namespace: "kubevirt".to_owned(),
            pull_policy: PullPolicy::IfNotPresent,
            image_pull_secrets: vec![],
            priority_class_name: Some("".to_owned()),
            verbosity: "2".to_owned(),
            infra_node_placement: None,
        }
    }

    fn deployment_of(resources: Vec<MtqResource>) -> Deployment {
        resources
            .into_iter()
            .find_map(|resource| match resource {
                MtqResource::Deployment(deployment) => Some(deployment),
                _ => None,
            })
            .expect("deployment")
    }

    fn pod_of(deployment: Deployment) -> PodSpec {
        deployment
            .spec
            .and_then(|spec| spec.template.spec)
            .expect("pod spec")
    }

    #[test]
    fn builds_resources_in_apply_order() {
        let kinds: Vec<&str> = factory()
            .build(&default_config())
            .iter()
            .map(MtqResource::kind)
            .collect();
        assert_eq!(kinds, vec!["ServiceAccount", "Service", "Deployment"]);
    }

    #[test]
    fn resources_share_name_and_labels() {
        let resources = factory().build(&default_config());
        let expected_labels = ResourceBuilder::default().labels(MTQ_LOCK_RESOURCE_NAME);
        for resource in &resources {
            assert_eq!(resource.name(), Some("mtq-lock"));
            assert_eq!(resource.labels(), Some(&expected_labels));
            assert_eq!(resource.metadata().namespace, None);
        }
        assert_eq!(
            expected_labels.get(MTQ_LABEL).map(String::as_str),
            Some("mtq-lock")
        );
    }

    #[test]
    fn service_targets_the_container_port() {
        let resources = factory().build(&default_config());
        let target_port = match &resources[1] {
            MtqResource::Service(service) => service
                .spec
                .as_ref()
                .and_then(|spec| spec.ports.as_ref())
                .and_then(|ports| ports.first())
                .and_then(|port| port.target_port.clone()),
            other => panic!("expected service, got {}", other.kind()),
        };
        let container_ports: Vec<i32> = pod_of(deployment_of(resources))
            .containers
            .iter()
            .flat_map(|container| container.ports.iter().flatten())
            .map(|port| port.container_port)
            .collect();
        assert_eq!(target_port, Some(IntOrString::Int(8443)));
        assert_eq!(container_ports, vec![8443]);
    }

    #[test]
    fn tls_mount_matches_tls_volume() {
        let pod = pod_of(deployment_of(factory().build(&default_config())));
        let mount_names: Vec<&str> = pod
            .containers
            .iter()
            .flat_map(|container| container.volume_mounts.iter().flatten())
            .map(|mount| mount.name.as_str())
            .collect();
        let volumes = pod.volumes.as_ref().expect("volumes");
        assert_eq!(mount_names, vec!["tls"]);
        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes[0].name, "tls");
        assert_eq!(
            volumes[0]
                .secret
                .as_ref()
                .and_then(|secret| secret.secret_name.as_deref()),
            Some("mtq-lock-server-cert")
        );
    }

    #[test]
    fn equal_config_gives_equal_resources() {
        let config = default_config();
        assert_eq!(factory().build(&config), factory().build(&config.clone()));
    }

    #[test]
    fn factory_is_shareable_across_threads() {
        let factory = std::sync::Arc::new(factory());
        let expected = factory.build(&default_config());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let factory = factory.clone();
                std::thread::spawn(move || factory.build(&default_config()))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("thread should not panic"), expected);
        }
    }

    #[test]
    fn default_scenario() {
        let deployment = deployment_of(factory().build(&default_config()));
        assert_eq!(deployment.spec.as_ref().and_then(|spec| spec.replicas), Some(1));

        let pod = pod_of(deployment);
        assert_eq!(pod.priority_class_name, None);
        assert_eq!(pod.image_pull_secrets, None);
        assert_eq!(pod.node_selector, None);
        assert_eq!(pod.affinity, None);
        assert_eq!(pod.tolerations, None);
        assert_eq!(pod.containers.len(), 1);

        let container = &pod.containers[0];
        assert_eq!(container.name, "mtq-lock");
        assert_eq!(container.image.as_deref(), Some("quay.io/x/mtq-lock:v1"));
        assert_eq!(
            container
                .readiness_probe
                .as_ref()
                .and_then(|readiness| readiness.exec.as_ref())
                .and_then(|exec| exec.command.clone()),
            Some(vec!["cat".to_owned(), "/tmp/ready".to_owned()])
        );
        let requests = container
            .resources
            .as_ref()
            .and_then(|resources| resources.requests.clone())
            .expect("requests");
        assert_eq!(requests["cpu"], Quantity("10m".to_owned()));
        assert_eq!(requests["memory"], Quantity("50Mi".to_owned()));
        let namespace = container
            .env
            .iter()
            .flatten()
            .find(|var| var.name == "KUBEVIRT_INSTALL_NAMESPACE")
            .and_then(|var| var.value.as_deref());
        assert_eq!(namespace, Some("kubevirt"));
    }

    #[test]
    fn priority_class_changes_nothing_else() {
        let factory = factory();
        let mut expected = deployment_of(factory.build(&default_config()));
        expected
            .spec
            .as_mut()
            .and_then(|spec| spec.template.spec.as_mut())
            .expect("pod spec")
            .priority_class_name = Some("system-cluster-critical".to_owned());

        let actual = deployment_of(factory.build(&MtqLockConfig {
            priority_class_name: Some("system-cluster-critical".to_owned()),
            ..default_config()
        }));
        assert_eq!(actual, expected);
    }

    #[test]
    fn unset_priority_class_matches_empty_one() {
        let factory = factory();
        let unset = factory.build(&MtqLockConfig {
            priority_class_name: None,
            ..default_config()
        });
        assert_eq!(unset, factory.build(&default_config()));
    }

    #[test]
    fn node_placement_is_passed_through() {
        let placement = NodePlacement {
            node_selector: Some(BTreeMap::from_iter([(
                "kubernetes.io/os".to_owned(),
                "linux".to_owned(),
            )])),
            affinity: None,
            tolerations: Some(vec![Toleration {
                key: Some("CriticalAddonsOnly".to_owned()),
                operator: Some("Exists".to_owned()),
                ..Default::default()
            }]),
        };
        let pod = pod_of(deployment_of(factory().build(&MtqLockConfig {
            infra_node_placement: Some(placement.clone()),
            ..default_config()
        })));
        assert_eq!(pod.node_selector, placement.node_selector);
        assert_eq!(pod.affinity, None);
        assert_eq!(pod.tolerations, placement.tolerations);
    }

    #[test]
    fn every_pod_setting_lands_together() {
        let secrets = vec![LocalObjectReference {
            name: Some("regcred".to_owned()),
        }];
        let placement = NodePlacement {
            node_selector: Some(BTreeMap::from_iter([(
                "node-role.kubernetes.io/infra".to_owned(),
                "".to_owned(),
            )])),
            ..Default::default()
        };
        let pod = pod_of(deployment_of(factory().build(&MtqLockConfig {
            image_pull_secrets: secrets.clone(),
            priority_class_name: Some("system-cluster-critical".to_owned()),
            infra_node_placement: Some(placement.clone()),
            ..default_config()
        })));
        assert_eq!(
            pod.priority_class_name.as_deref(),
            Some("system-cluster-critical")
        );
        assert_eq!(pod.image_pull_secrets, Some(secrets));
        assert_eq!(pod.node_selector, placement.node_selector);
        assert_eq!(pod.service_account_name.as_deref(), Some("mtq-lock"));
        assert_eq!(pod.containers.len(), 1);
        assert_eq!(pod.volumes.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn pull_secrets_keep_their_order() {
        let secrets = vec![
            LocalObjectReference {
                name: Some("second".to_owned()),
            },
            LocalObjectReference {
                name: Some("first".to_owned()),
            },
        ];
        let pod = pod_of(deployment_of(factory().build(&MtqLockConfig {
            image_pull_secrets: secrets.clone(),
            pull_policy: PullPolicy::Always,
            ..default_config()
        })));
        assert_eq!(pod.image_pull_secrets, Some(secrets));
        assert_eq!(
            pod.containers[0].image_pull_policy.as_deref(),
            Some("Always")
        );
    }

    #[test]
    fn configured_builder_labels_every_resource() {
        let builder = ResourceBuilder::new(&BTreeMap::from_iter([(
            APP_KUBERNETES_VERSION_LABEL.to_owned(),
            "v1.2.0".to_owned(),
        )]));
        let factory = ResourceFactory::with_builder(builder).expect("valid factory");
        for resource in factory.build(&default_config()) {
            assert_eq!(
                resource
                    .labels()
                    .and_then(|labels| labels.get(APP_KUBERNETES_VERSION_LABEL))
                    .map(String::as_str),
                Some("v1.2.0"),
                "{}",
                resource.kind()
            );
        }
    }
}
