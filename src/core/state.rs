//! State descriptions handed to the builder.
//!
//! A `State` or `CompositeState` value describes a state before it is
//! registered. Registration moves it into the machine and hands back a
//! `StateId`, the only identity the engine uses afterwards.

use crate::core::action::{ActionResult, StateAction};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle of a registered state.
///
/// Ids are assigned by the builder in registration order and are only
/// meaningful for the machine that issued them. Names are display
/// attributes; equality is by id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(usize);

impl StateId {
    /// Id of the machine's root composite.
    pub const ROOT: StateId = StateId(0);

    pub(crate) const fn new(index: usize) -> Self {
        StateId(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Description of a simple (leaf) state.
///
/// # Example
///
/// ```rust
/// use hsmkit::core::State;
///
/// struct Log(Vec<&'static str>);
///
/// let state = State::new("Closed")
///     .on_entry(|log: &mut Log| {
///         log.0.push("enter Closed");
///         Ok(())
///     })
///     .end_state();
///
/// assert_eq!(state.name(), "Closed");
/// assert!(state.is_end_state());
/// ```
pub struct State<C> {
    pub(crate) name: String,
    pub(crate) entry: Option<StateAction<C>>,
    pub(crate) exit: Option<StateAction<C>>,
    pub(crate) end_state: bool,
}

impl<C> State<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry: None,
            exit: None,
            end_state: false,
        }
    }

    /// Action run whenever the state is entered through a transition.
    pub fn on_entry<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C) -> ActionResult + Send + Sync + 'static,
    {
        self.entry = Some(Box::new(action));
        self
    }

    /// Action run whenever the state is left through one of its responses.
    pub fn on_exit<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C) -> ActionResult + Send + Sync + 'static,
    {
        self.exit = Some(Box::new(action));
        self
    }

    /// Mark the state as terminal.
    pub fn end_state(mut self) -> Self {
        self.end_state = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_end_state(&self) -> bool {
        self.end_state
    }
}

impl<C> fmt::Debug for State<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("end_state", &self.end_state)
            .finish_non_exhaustive()
    }
}

/// Description of a composite state owning a nested sub-machine.
///
/// The initial action runs once, on the first event dispatched to the
/// composite. The end action runs each time the active child becomes an end
/// state.
pub struct CompositeState<C> {
    pub(crate) state: State<C>,
    pub(crate) initial_action: Option<StateAction<C>>,
    pub(crate) end_action: Option<StateAction<C>>,
}

impl<C> CompositeState<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            state: State::new(name),
            initial_action: None,
            end_action: None,
        }
    }

    pub fn on_entry<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C) -> ActionResult + Send + Sync + 'static,
    {
        self.state = self.state.on_entry(action);
        self
    }

    pub fn on_exit<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C) -> ActionResult + Send + Sync + 'static,
    {
        self.state = self.state.on_exit(action);
        self
    }

    pub fn end_state(mut self) -> Self {
        self.state = self.state.end_state();
        self
    }

    /// Action run once, when the composite first takes part in dispatch.
    pub fn on_initial<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C) -> ActionResult + Send + Sync + 'static,
    {
        self.initial_action = Some(Box::new(action));
        self
    }

    /// Action run when the active child reaches an end state.
    pub fn on_end<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C) -> ActionResult + Send + Sync + 'static,
    {
        self.end_action = Some(Box::new(action));
        self
    }

    pub fn name(&self) -> &str {
        self.state.name()
    }
}

impl<C> fmt::Debug for CompositeState<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeState")
            .field("name", &self.state.name)
            .field("has_initial_action", &self.initial_action.is_some())
            .field("has_end_action", &self.end_action.is_some())
            .finish_non_exhaustive()
    }
}
