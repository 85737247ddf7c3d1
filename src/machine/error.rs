//! Errors raised while dispatching events.

use crate::core::{ActionError, StateId};
use thiserror::Error;

/// Errors that can occur during dispatch or an active run
#[derive(Debug, Error)]
pub enum MachineError {
    /// A response names a state that is not registered alongside its owner.
    #[error("State '{target}' targeted from '{owner}' is not registered alongside it")]
    UnregisteredState { target: String, owner: String },

    /// No response for the event exists anywhere in the active chain.
    #[error("No response to event '{event}' in active state '{state}'")]
    UnhandledEvent { state: String, event: String },

    #[error("Unknown state {0}")]
    UnknownState(StateId),

    #[error("Composite state '{0}' has no active child")]
    NoActiveChild(String),

    /// An application callable failed. The original error is carried as is.
    #[error("Action failed: {0}")]
    Action(#[source] ActionError),
}
