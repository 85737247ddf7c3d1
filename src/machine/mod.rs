//! Hierarchical state machine runtime.
//!
//! A `Machine` owns every registered state in an arena indexed by `StateId`.
//! The root of the arena is a composite named after the machine; all other
//! states hang below it.
//!
//! # Driving a machine
//!
//! - **Reactive**: call [`Machine::handle_event`] (or [`Machine::dispatch`])
//!   whenever an event arrives. The call runs to completion and reports the
//!   active leaf.
//! - **Active**: hand an event source to [`Machine::run`], which pulls events
//!   until an end state is reached or the source is exhausted.
//!
//! Use [`SharedMachine`] when several threads need to drive the same machine.

mod dispatch;
mod driver;
mod error;
pub(crate) mod node;
mod options;
mod shared;

pub use dispatch::Outcome;
pub use driver::RunSummary;
pub use error::MachineError;
pub use options::{MachineOptions, UnhandledStrategy};
pub use shared::SharedMachine;

use crate::builder::BuildError;
use crate::core::{Event, Response, StateHistory, StateId};
use crate::validation::{self, TopologyError};
use node::{label, Node};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use uuid::Uuid;

/// A hierarchical state machine over a caller-owned context `C`.
///
/// The context is passed by reference into every guard and action; the
/// machine itself holds no application data.
pub struct Machine<C> {
    id: Uuid,
    nodes: Vec<Node<C>>,
    history: StateHistory,
    options: MachineOptions,
}

impl<C> Machine<C> {
    pub(crate) fn from_parts(nodes: Vec<Node<C>>, options: MachineOptions) -> Self {
        let history = match options.history_limit {
            Some(limit) => StateHistory::with_limit(limit),
            None => StateHistory::new(),
        };
        Self {
            id: Uuid::new_v4(),
            nodes,
            history,
            options,
        }
    }

    /// Unique id of this machine instance.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Name given to the machine, which is also the root composite's name.
    pub fn name(&self) -> &str {
        &self.nodes[StateId::ROOT.index()].name
    }

    pub fn root(&self) -> StateId {
        StateId::ROOT
    }

    pub fn options(&self) -> &MachineOptions {
        &self.options
    }

    /// The most specific active state, found by following each composite's
    /// current child down from the root.
    pub fn current(&self) -> StateId {
        self.active_leaf(StateId::ROOT)
    }

    pub fn current_name(&self) -> &str {
        &self.nodes[self.current().index()].name
    }

    /// Active states from the root's current child down to the active leaf.
    pub fn active_path(&self) -> Vec<StateId> {
        let mut path = Vec::new();
        let mut id = StateId::ROOT;
        while let Some(next) = self.current_child(id) {
            path.push(next);
            id = next;
        }
        path
    }

    /// Current child of a composite. `None` for leaves and unknown ids.
    pub fn current_child(&self, composite: StateId) -> Option<StateId> {
        self.nodes
            .get(composite.index())
            .and_then(Node::as_composite)
            .and_then(|c| c.current)
    }

    /// Registered children of a composite, in registration order.
    pub fn children(&self, composite: StateId) -> &[StateId] {
        self.nodes
            .get(composite.index())
            .and_then(Node::as_composite)
            .map(|c| c.children.as_slice())
            .unwrap_or_default()
    }

    pub fn parent(&self, id: StateId) -> Option<StateId> {
        self.nodes.get(id.index()).and_then(|node| node.parent)
    }

    pub fn state_name(&self, id: StateId) -> Option<&str> {
        self.nodes.get(id.index()).map(|node| node.name.as_str())
    }

    /// Look a state up by name.
    pub fn find(&self, name: &str) -> Option<StateId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(StateId::new)
    }

    pub fn is_end_state(&self, id: StateId) -> bool {
        self.nodes.get(id.index()).is_some_and(|node| node.end_state)
    }

    pub fn is_composite(&self, id: StateId) -> bool {
        self.nodes.get(id.index()).is_some_and(Node::is_composite)
    }

    /// Whether a composite has taken part in dispatch yet.
    pub fn is_started(&self, composite: StateId) -> bool {
        self.nodes
            .get(composite.index())
            .and_then(Node::as_composite)
            .is_some_and(|c| c.started)
    }

    /// Whether the machine rests in an end state: the root's current child,
    /// or the active leaf at any depth below it.
    pub fn is_finished(&self) -> bool {
        self.reaches_end(StateId::ROOT)
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Register another response after the machine was built.
    ///
    /// The target is not checked here; a target outside the owner's scope is
    /// reported as `MachineError::UnregisteredState` when the response fires.
    pub fn add_response(
        &mut self,
        owner: StateId,
        event: impl Into<Event>,
        response: Response<C>,
    ) -> Result<(), BuildError> {
        if owner == StateId::ROOT {
            return Err(BuildError::RootResponse(self.name().to_string()));
        }
        let node = self
            .nodes
            .get_mut(owner.index())
            .ok_or(BuildError::UnknownState(owner))?;
        node.add_response(&event.into(), response);
        Ok(())
    }

    /// Check the topology, accumulating every problem found.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<TopologyError>> {
        validation::check_topology(&self.nodes)
    }

    /// Follow current children down from `id` to the most specific state.
    pub(crate) fn active_leaf(&self, mut id: StateId) -> StateId {
        while let Some(next) = self.current_child(id) {
            id = next;
        }
        id
    }

    /// Whether the composite's current child, or the leaf active under it, is
    /// an end state.
    pub(crate) fn reaches_end(&self, composite: StateId) -> bool {
        self.current_child(composite).is_some_and(|child| {
            self.is_end_state(child) || self.is_end_state(self.active_leaf(child))
        })
    }

    pub(crate) fn node(&self, id: StateId) -> Result<&Node<C>, MachineError> {
        self.nodes
            .get(id.index())
            .ok_or(MachineError::UnknownState(id))
    }

    pub(crate) fn node_mut(&mut self, id: StateId) -> Result<&mut Node<C>, MachineError> {
        self.nodes
            .get_mut(id.index())
            .ok_or(MachineError::UnknownState(id))
    }

    pub(crate) fn label(&self, id: StateId) -> String {
        label(&self.nodes, id)
    }
}
