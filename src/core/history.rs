//! State transition history tracking.
//!
//! Records every consumed dispatch as a move between active leaves, so the
//! path a machine took can be inspected after the fact.

use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single consumed dispatch.
///
/// `from` and `to` are the most specific active leaves before and after the
/// event. They are equal for a self-transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// Active leaf before the event
    pub from: StateId,
    /// Active leaf after the event
    pub to: StateId,
    /// Name of the event that was consumed
    pub event: String,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of transitions, optionally bounded.
///
/// When a limit is set, the oldest transitions are dropped first.
///
/// # Example
///
/// ```rust
/// use hsmkit::builder::MachineBuilder;
/// use hsmkit::core::{Event, Response, State};
///
/// let mut builder = MachineBuilder::<()>::new("toggle");
/// let off = builder.add_state(builder.root(), State::new("Off")).unwrap();
/// let on = builder.add_state(builder.root(), State::new("On")).unwrap();
/// builder.add_response(off, "flip", Response::to(on)).unwrap();
/// builder.add_response(on, "flip", Response::to(off)).unwrap();
/// let mut machine = builder.build().unwrap();
///
/// machine.handle_event(&Event::new("flip"), &mut ()).unwrap();
/// machine.handle_event(&Event::new("flip"), &mut ()).unwrap();
///
/// assert_eq!(machine.history().get_path(), vec![off, on, off]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<StateTransition>,
    limit: Option<usize>,
}

impl StateHistory {
    /// Create a new, unbounded, empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty history keeping at most `limit` transitions.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Append a transition, evicting the oldest one past the limit.
    pub fn record(&mut self, transition: StateTransition) {
        self.transitions.push(transition);
        if let Some(limit) = self.limit {
            if self.transitions.len() > limit {
                let excess = self.transitions.len() - limit;
                self.transitions.drain(..excess);
            }
        }
    }

    /// Get the path of leaves traversed.
    ///
    /// Returns the `from` of the first retained transition followed by the
    /// `to` of each transition.
    pub fn get_path(&self) -> Vec<StateId> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Duration between the first and last retained transitions.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}
