//! Errors surfaced while preparing resource synthesis.

/// A fixed value baked into the operator is malformed.
///
/// This indicates a programming error rather than an operational one and should abort the process
/// at start up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A resource quantity literal does not follow the Kubernetes quantity grammar.
    #[error("invalid {resource} quantity {value:?}: {reason}")]
    InvalidQuantity {
        /// Resource the quantity was meant for, i.e. cpu or memory.
        resource: &'static str,
        /// The offending literal.
        value: String,
        /// What is wrong with the literal.
        reason: &'static str,
    },
}
