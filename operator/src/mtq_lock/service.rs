use k8s_openapi::{
    api::core::v1::{Service, ServicePort, ServiceSpec},
    apimachinery::pkg::util::intstr::IntOrString,
};

use crate::utils::ResourceBuilder;

use super::{MTQ_LOCK_CONTAINER_PORT, MTQ_LOCK_RESOURCE_NAME, MTQ_LOCK_SERVICE_PORT};

/// NodePort service forwarding the webhook port to the lock server.
pub fn service(builder: &ResourceBuilder) -> Service {
    builder.create_service(
        MTQ_LOCK_RESOURCE_NAME,
        ServiceSpec {
            type_: Some("NodePort".to_owned()),
            ports: Some(vec![ServicePort {
                port: MTQ_LOCK_SERVICE_PORT,
                target_port: Some(IntOrString::Int(MTQ_LOCK_CONTAINER_PORT)),
                protocol: Some("TCP".to_owned()),
                ..Default::default()
            }]),
            ..Default::default()
        },
    )
}
