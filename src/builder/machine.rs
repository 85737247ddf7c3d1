//! Builder for assembling hierarchical machines.

use crate::builder::error::BuildError;
use crate::core::{ActionResult, CompositeState, Event, Response, State, StateId};
use crate::machine::node::Node;
use crate::machine::{Machine, MachineOptions, UnhandledStrategy};
use crate::validation;
use stillwater::validation::Validation;
use tracing::debug;

/// Builder for assembling a machine.
///
/// States are registered under a parent composite (the root, or any
/// composite registered earlier) and receive a `StateId`. The first child
/// registered under a composite is its initial child unless
/// [`set_initial`](Self::set_initial) picks another one.
///
/// # Example
///
/// ```rust
/// use hsmkit::builder::MachineBuilder;
/// use hsmkit::core::{CompositeState, Event, Response, State};
///
/// let mut builder = MachineBuilder::<()>::new("modem");
/// let root = builder.root();
/// let offline = builder.add_state(root, State::new("Offline")).unwrap();
/// let online = builder.add_composite(root, CompositeState::new("Online")).unwrap();
/// let idle = builder.add_state(online, State::new("Idle")).unwrap();
///
/// builder.add_response(offline, "dial", Response::to(online)).unwrap();
/// builder.add_response(online, "hangup", Response::to(offline)).unwrap();
///
/// let mut machine = builder.build().unwrap();
/// assert_eq!(machine.handle_event(&Event::new("dial"), &mut ()).unwrap(), Some(idle));
/// assert_eq!(machine.handle_event(&Event::new("hangup"), &mut ()).unwrap(), Some(offline));
/// ```
pub struct MachineBuilder<C> {
    nodes: Vec<Node<C>>,
    options: MachineOptions,
}

impl<C> MachineBuilder<C> {
    /// Create a builder for a machine named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node::root(name.into())],
            options: MachineOptions::default(),
        }
    }

    /// Id of the root composite, the parent of every top-level state.
    pub fn root(&self) -> StateId {
        StateId::ROOT
    }

    /// Register a leaf state under `parent`.
    pub fn add_state(&mut self, parent: StateId, state: State<C>) -> Result<StateId, BuildError> {
        self.register(parent, |parent| Node::leaf(state, parent))
    }

    /// Register a composite state under `parent`.
    pub fn add_composite(
        &mut self,
        parent: StateId,
        composite: CompositeState<C>,
    ) -> Result<StateId, BuildError> {
        self.register(parent, |parent| Node::composite(composite, parent))
    }

    /// Choose which child a composite starts in.
    pub fn set_initial(&mut self, composite: StateId, child: StateId) -> Result<(), BuildError> {
        let child_name = self.name_of(child)?;
        let composite_name = self.name_of(composite)?;
        let node = &mut self.nodes[composite.index()];
        let data = node
            .as_composite_mut()
            .ok_or_else(|| BuildError::NotComposite(composite_name.clone()))?;
        if !data.children.contains(&child) {
            return Err(BuildError::NotAChild {
                composite: composite_name,
                child: child_name,
            });
        }
        data.current = Some(child);
        Ok(())
    }

    /// Append a response to the candidate list of `owner` for `event`.
    pub fn add_response(
        &mut self,
        owner: StateId,
        event: impl Into<Event>,
        response: Response<C>,
    ) -> Result<(), BuildError> {
        if owner == StateId::ROOT {
            return Err(BuildError::RootResponse(self.nodes[0].name.clone()));
        }
        let node = self
            .nodes
            .get_mut(owner.index())
            .ok_or(BuildError::UnknownState(owner))?;
        node.add_response(&event.into(), response);
        Ok(())
    }

    /// Action run once, before the machine handles its first event.
    pub fn on_initial<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C) -> ActionResult + Send + Sync + 'static,
    {
        if let Some(root) = self.nodes[0].as_composite_mut() {
            root.initial_action = Some(Box::new(action));
        }
        self
    }

    /// Action run when a top-level end state is reached.
    pub fn on_end<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C) -> ActionResult + Send + Sync + 'static,
    {
        if let Some(root) = self.nodes[0].as_composite_mut() {
            root.end_action = Some(Box::new(action));
        }
        self
    }

    /// Set how an active run treats events nobody responds to.
    pub fn on_unhandled(mut self, strategy: UnhandledStrategy) -> Self {
        self.options.on_unhandled = strategy;
        self
    }

    /// Enable or disable transition history (enabled by default).
    pub fn record_history(mut self, enabled: bool) -> Self {
        self.options.record_history = enabled;
        self
    }

    /// Keep at most `limit` transitions in history.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.options.history_limit = Some(limit);
        self
    }

    /// Validate the topology and build the machine.
    ///
    /// Every problem found is reported at once in `BuildError::Topology`.
    pub fn build(self) -> Result<Machine<C>, BuildError> {
        match validation::check_topology(&self.nodes) {
            Validation::Success(_) => {}
            Validation::Failure(errors) => {
                return Err(BuildError::Topology(errors.iter().cloned().collect()));
            }
        }

        debug!(
            machine = %self.nodes[0].name,
            states = self.nodes.len() - 1,
            "Machine built"
        );
        Ok(Machine::from_parts(self.nodes, self.options))
    }

    fn register(
        &mut self,
        parent: StateId,
        make: impl FnOnce(StateId) -> Node<C>,
    ) -> Result<StateId, BuildError> {
        let parent_name = self.name_of(parent)?;
        if !self.nodes[parent.index()].is_composite() {
            return Err(BuildError::NotComposite(parent_name));
        }

        let node = make(parent);
        if self.nodes.iter().any(|existing| existing.name == node.name) {
            return Err(BuildError::DuplicateState(node.name));
        }

        let id = StateId::new(self.nodes.len());
        self.nodes.push(node);
        if let Some(data) = self.nodes[parent.index()].as_composite_mut() {
            data.children.push(id);
            data.current.get_or_insert(id);
        }
        Ok(id)
    }

    fn name_of(&self, id: StateId) -> Result<String, BuildError> {
        self.nodes
            .get(id.index())
            .map(|node| node.name.clone())
            .ok_or(BuildError::UnknownState(id))
    }
}
