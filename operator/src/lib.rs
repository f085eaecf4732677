//! Provides API for synthesizing the resources of the mtq operator components.
#![warn(missing_docs)]

/// Error module for failures while preparing synthesis.
pub mod error;
/// Labels module for managing resource labels.
pub mod labels;
/// Manifest module for the synthesized objects and their rendering.
pub mod manifest;
/// MtqLock module for the resources of the namespace lock server.
pub mod mtq_lock;
/// Placement module for node scheduling constraints.
pub mod placement;
/// Utils module for shared resource builders.
pub mod utils;
