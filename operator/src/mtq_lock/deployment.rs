use k8s_openapi::api::{
    apps::v1::Deployment,
    core::v1::{
        ContainerPort, EnvVar, ExecAction, PodSpec, Probe, ResourceRequirements,
        SecretVolumeSource, Volume, VolumeMount,
    },
};

use crate::{
    labels::{APP_KUBERNETES_PART_OF_LABEL, APP_KUBERNETES_VERSION_LABEL},
    utils::{
        create_container, env::EnvEntry, resource_requests::ResourceRequestsConfig,
        ResourceBuilder,
    },
};

use super::{
    MtqLockConfig, MTQ_LOCK_CONTAINER_PORT, MTQ_LOCK_RESOURCE_NAME, MTQ_LOCK_SERVER_CERT_SECRET,
};

/// Name of the volume holding the serving certificate.
pub const TLS_VOLUME_NAME: &str = "tls";
/// Path the serving certificate is mounted at.
pub const TLS_MOUNT_PATH: &str = "/etc/admission-webhook/tls";
/// Default mode of files projected from config maps and secrets, 0644.
pub const CONFIG_MAP_VOLUME_SOURCE_DEFAULT_MODE: i32 = 0o644;

const READY_FILE: &str = "/tmp/ready";

const INSTALLER_PART_OF_ENV: &str = "INSTALLER_PART_OF_LABEL";
const INSTALLER_VERSION_ENV: &str = "INSTALLER_VERSION_LABEL";
const TLS_ENV: &str = "TLS";
const KUBEVIRT_INSTALL_NAMESPACE_ENV: &str = "KUBEVIRT_INSTALL_NAMESPACE";

/// Single replica deployment of the lock server.
pub fn deployment(
    builder: &ResourceBuilder,
    requests: &ResourceRequestsConfig,
    config: &MtqLockConfig,
) -> Deployment {
    let mut container = create_container(
        MTQ_LOCK_RESOURCE_NAME,
        &config.image,
        &config.verbosity,
        config.pull_policy.as_str(),
    );
    container.ports = Some(vec![ContainerPort {
        container_port: MTQ_LOCK_CONTAINER_PORT,
        protocol: Some("TCP".to_owned()),
        ..Default::default()
    }]);
    container.env = Some(env_vars(&config.namespace));
    container.readiness_probe = Some(Probe {
        exec: Some(ExecAction {
            command: Some(vec!["cat".to_owned(), READY_FILE.to_owned()]),
        }),
        initial_delay_seconds: Some(2),
        period_seconds: Some(5),
        failure_threshold: Some(3),
        success_threshold: Some(1),
        timeout_seconds: Some(1),
        ..Default::default()
    });
    container.resources = Some(ResourceRequirements {
        requests: Some(requests.clone().into()),
        ..Default::default()
    });
    container.volume_mounts = Some(vec![VolumeMount {
        name: TLS_VOLUME_NAME.to_owned(),
        mount_path: TLS_MOUNT_PATH.to_owned(),
        read_only: Some(true),
        ..Default::default()
    }]);

    let pod = PodSpec {
        priority_class_name: config.priority_class().map(str::to_owned),
        containers: vec![container],
        volumes: Some(vec![Volume {
            name: TLS_VOLUME_NAME.to_owned(),
            secret: Some(SecretVolumeSource {
                secret_name: Some(MTQ_LOCK_SERVER_CERT_SECRET.to_owned()),
                default_mode: Some(CONFIG_MAP_VOLUME_SOURCE_DEFAULT_MODE),
                ..Default::default()
            }),
            ..Default::default()
        }]),
        ..Default::default()
    };
    builder.create_deployment(
        MTQ_LOCK_RESOURCE_NAME,
        MTQ_LOCK_RESOURCE_NAME,
        &config.image_pull_secrets,
        1,
        config.infra_node_placement.as_ref(),
        pod,
    )
}

fn env_vars(namespace: &str) -> Vec<EnvVar> {
    vec![
        EnvEntry::pod_label(INSTALLER_PART_OF_ENV, APP_KUBERNETES_PART_OF_LABEL),
        EnvEntry::pod_label(INSTALLER_VERSION_ENV, APP_KUBERNETES_VERSION_LABEL),
        EnvEntry::literal(TLS_ENV, "true"),
        EnvEntry::literal(KUBEVIRT_INSTALL_NAMESPACE_ENV, namespace),
    ]
    .into_iter()
    .map(EnvVar::from)
    .collect()
}
