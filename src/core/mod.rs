//! Core state machine types.
//!
//! This module contains the building blocks every machine is assembled from:
//! - Events and their parameters
//! - State and composite state descriptions
//! - Responses (candidate transitions) and their guards
//! - Transition history

mod action;
mod event;
mod guard;
mod history;
mod response;
mod state;

pub use action::{ActionError, ActionResult, StateAction, TransitionAction};
pub use event::Event;
pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use response::Response;
pub use state::{CompositeState, State, StateId};
