//! Build errors for machine assembly.

use crate::core::StateId;
use crate::validation::TopologyError;
use thiserror::Error;

/// Errors that can occur when assembling a machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("State name '{0}' is already registered")]
    DuplicateState(String),

    #[error("Unknown state {0}")]
    UnknownState(StateId),

    #[error("State '{0}' is not a composite state and cannot own children")]
    NotComposite(String),

    #[error("State '{child}' is not a child of '{composite}'")]
    NotAChild { composite: String, child: String },

    #[error("Root state '{0}' cannot own responses. Register them on a child state")]
    RootResponse(String),

    #[error("Invalid machine topology ({} problem(s)): {}", .0.len(), describe(.0))]
    Topology(Vec<TopologyError>),
}

fn describe(problems: &[TopologyError]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
