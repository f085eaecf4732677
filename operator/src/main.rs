//! Renders the desired-state manifests of the mtq-lock component
#![deny(missing_docs)]

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use k8s_openapi::api::core::v1::LocalObjectReference;
use tracing::{debug, info};

use mtq_common::telemetry;
use mtq_operator::{
    labels::{APP_KUBERNETES_PART_OF_LABEL, APP_KUBERNETES_VERSION_LABEL},
    manifest,
    mtq_lock::{MtqLockConfig, PullPolicy, ResourceFactory},
    placement::NodePlacement,
    utils::ResourceBuilder,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Container image of the lock server.
    #[arg(long, env = "MTQ_LOCK_IMAGE")]
    image: String,

    /// Namespace KubeVirt is installed into.
    #[arg(long, env = "MTQ_NAMESPACE", default_value = "kubevirt")]
    namespace: String,

    /// Image pull policy, one of Always, IfNotPresent, Never.
    #[arg(long, env = "MTQ_PULL_POLICY", default_value = "IfNotPresent")]
    pull_policy: PullPolicy,

    /// Secret used to pull the image, may be repeated.
    #[arg(
        long = "image-pull-secret",
        env = "MTQ_IMAGE_PULL_SECRETS",
        value_delimiter = ','
    )]
    image_pull_secrets: Vec<String>,

    /// Priority class of the lock server pod.
    #[arg(long, env = "MTQ_PRIORITY_CLASS_NAME")]
    priority_class_name: Option<String>,

    /// Log verbosity of the lock server.
    #[arg(long, env = "MTQ_VERBOSITY", default_value = "1")]
    verbosity: String,

    /// YAML or JSON file describing node placement of the lock server.
    #[arg(long, env = "MTQ_NODE_PLACEMENT")]
    node_placement: Option<PathBuf>,

    /// Value of the app.kubernetes.io/part-of label on all resources.
    #[arg(long, env = "MTQ_PART_OF")]
    part_of: Option<String>,

    /// Value of the app.kubernetes.io/version label on all resources.
    #[arg(long, env = "MTQ_APP_VERSION")]
    app_version: Option<String>,

    /// Format of the logs written to stderr.
    #[arg(long, env = "MTQ_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogFormat {
    Compact,
    Json,
}

impl From<LogFormat> for telemetry::LogFormat {
    fn from(value: LogFormat) -> Self {
        match value {
            LogFormat::Compact => telemetry::LogFormat::Compact,
            LogFormat::Json => telemetry::LogFormat::Json,
        }
    }
}

impl Cli {
    fn operator_labels(&self) -> BTreeMap<String, String> {
        [
            (APP_KUBERNETES_PART_OF_LABEL, &self.part_of),
            (APP_KUBERNETES_VERSION_LABEL, &self.app_version),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|value| (key.to_owned(), value)))
        .collect()
    }

    fn config(&self) -> Result<MtqLockConfig> {
        let infra_node_placement = match &self.node_placement {
            Some(path) => {
                let data = std::fs::read_to_string(path)
                    .with_context(|| format!("reading node placement {}", path.display()))?;
                let placement: NodePlacement = serde_yaml::from_str(&data)
                    .with_context(|| format!("parsing node placement {}", path.display()))?;
                Some(placement)
            }
            None => None,
        };
        Ok(MtqLockConfig {
            image: self.image.clone(),
            namespace: self.namespace.clone(),
            pull_policy: self.pull_policy,
            image_pull_secrets: self
                .image_pull_secrets
                .iter()
                .filter(|name| !name.is_empty())
                .map(|name| LocalObjectReference {
                    name: Some(name.clone()),
                })
                .collect(),
            priority_class_name: self.priority_class_name.clone(),
            verbosity: self.verbosity.clone(),
            infra_node_placement,
        })
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    telemetry::init(args.log_format.into())?;

    // Malformed built in quantities are a defect, refuse to render anything.
    let factory = ResourceFactory::with_builder(ResourceBuilder::new(&args.operator_labels()))?;
    let config = args.config()?;
    info!(image = %config.image, namespace = %config.namespace, "rendering mtq-lock manifests");

    let resources = factory.build(&config);
    for resource in &resources {
        debug!(kind = resource.kind(), name = ?resource.name(), "synthesized resource");
    }
    print!("{}", manifest::to_yaml(&resources)?);
    Ok(())
}
