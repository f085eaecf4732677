//! Resource requests and validation of quantity literals.
use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

use crate::error::ConfigError;

const BINARY_SI_SUFFIXES: [&str; 6] = ["Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];
const DECIMAL_SI_SUFFIXES: [&str; 10] = ["n", "u", "m", "", "k", "M", "G", "T", "P", "E"];

/// Resource requests of a container. No limits are derived from these.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRequestsConfig {
    /// Cpu resource request
    pub cpu: Quantity,
    /// Memory resource request
    pub memory: Quantity,
}

impl ResourceRequestsConfig {
    /// Build requests from quantity literals, rejecting anything the API server would refuse.
    pub fn parse(cpu: &str, memory: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            cpu: parse_quantity("cpu", cpu)?,
            memory: parse_quantity("memory", memory)?,
        })
    }
}

impl From<ResourceRequestsConfig> for BTreeMap<String, Quantity> {
    fn from(value: ResourceRequestsConfig) -> Self {
        BTreeMap::from_iter([
            ("cpu".to_owned(), value.cpu),
            ("memory".to_owned(), value.memory),
        ])
    }
}

/// Parse a quantity literal of the form `<signedNumber><suffix>`.
///
/// The suffix is either a binary SI suffix (`Ki`, `Mi`, ...), a decimal SI suffix (`m`, `k`,
/// `M`, ...) or a decimal exponent (`e3`, `E-2`). Negative amounts are rejected since they are
/// never valid requests.
pub fn parse_quantity(resource: &'static str, value: &str) -> Result<Quantity, ConfigError> {
    let invalid = |reason: &'static str| ConfigError::InvalidQuantity {
        resource,
        value: value.to_owned(),
        reason,
    };
    if value.is_empty() {
        return Err(invalid("quantity is empty"));
    }

    let split = value
        .char_indices()
        .find(|(i, c)| {
            !(c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '+' || *c == '-')))
        })
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    let (number, suffix) = value.split_at(split);

    let unsigned = match number.strip_prefix('-') {
        Some(_) => return Err(invalid("quantity must not be negative")),
        None => number.strip_prefix('+').unwrap_or(number),
    };
    let mut parts = unsigned.split('.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();
    if parts.next().is_some() || (whole.is_empty() && fraction.is_empty()) {
        return Err(invalid("quantity must start with a number"));
    }

    if BINARY_SI_SUFFIXES.contains(&suffix) || DECIMAL_SI_SUFFIXES.contains(&suffix) {
        return Ok(Quantity(value.to_owned()));
    }
    match suffix.strip_prefix(|c: char| c == 'e' || c == 'E') {
        Some(exponent) => {
            let digits = exponent
                .strip_prefix(|c: char| c == '+' || c == '-')
                .unwrap_or(exponent);
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                Ok(Quantity(value.to_owned()))
            } else {
                Err(invalid("malformed decimal exponent"))
            }
        }
        None => Err(invalid("unknown suffix")),
    }
}
