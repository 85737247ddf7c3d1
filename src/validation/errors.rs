//! Topology problems reported by validation.

use thiserror::Error;

/// Problems that make a machine's topology unusable
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TopologyError {
    #[error("Composite state '{composite}' has no child states")]
    EmptyComposite { composite: String },

    #[error("Response to '{event}' on '{owner}' targets '{target}', which is not registered alongside it")]
    ForeignTarget {
        owner: String,
        event: String,
        target: String,
    },

    #[error("State name '{name}' is registered more than once")]
    DuplicateName { name: String },
}
