use std::collections::BTreeMap;

/// Label identifying which mtq component a resource belongs to.
pub const MTQ_LABEL: &str = "mtq.kubevirt.io";
/// Well known label naming the component family.
pub const APP_KUBERNETES_COMPONENT_LABEL: &str = "app.kubernetes.io/component";
/// Well known label naming the managing operator.
pub const APP_KUBERNETES_MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";
/// Well known label naming the higher level application the resources are part of.
pub const APP_KUBERNETES_PART_OF_LABEL: &str = "app.kubernetes.io/part-of";
/// Well known label carrying the installed version.
pub const APP_KUBERNETES_VERSION_LABEL: &str = "app.kubernetes.io/version";

const COMPONENT: &str = "multi-tenant";
const MANAGED_BY: &str = "mtq-operator";

/// Create labels that can be used as a unique selector for a given component name.
pub fn selector_labels(component: &str) -> BTreeMap<String, String> {
    BTreeMap::from_iter(vec![(MTQ_LABEL.to_owned(), component.to_owned())])
}

/// Labels that indicate the resource is managed by the mtq operator.
pub fn managed_labels() -> BTreeMap<String, String> {
    BTreeMap::from_iter(vec![
        (
            APP_KUBERNETES_COMPONENT_LABEL.to_owned(),
            COMPONENT.to_owned(),
        ),
        (
            APP_KUBERNETES_MANAGED_BY_LABEL.to_owned(),
            MANAGED_BY.to_owned(),
        ),
    ])
}

/// Extend the managed labels with the provided labels.
/// Provided labels win over managed labels with the same key.
pub fn managed_labels_extend(labels: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut managed = managed_labels();
    managed.extend(labels.iter().map(|(k, v)| (k.clone(), v.clone())));
    managed
}
