//! Arena entries backing a machine.

use crate::core::{ActionResult, CompositeState, Event, Response, State, StateAction, StateId};
use std::collections::HashMap;

/// Nested sub-machine data carried by a composite state.
pub(crate) struct Composite<C> {
    pub(crate) children: Vec<StateId>,
    pub(crate) current: Option<StateId>,
    pub(crate) started: bool,
    pub(crate) ended: bool,
    pub(crate) initial_action: Option<StateAction<C>>,
    pub(crate) end_action: Option<StateAction<C>>,
}

impl<C> Composite<C> {
    fn new(initial_action: Option<StateAction<C>>, end_action: Option<StateAction<C>>) -> Self {
        Self {
            children: Vec::new(),
            current: None,
            started: false,
            ended: false,
            initial_action,
            end_action,
        }
    }
}

pub(crate) enum StateKind<C> {
    Leaf,
    Composite(Composite<C>),
}

/// A registered state. Node 0 of every arena is the root composite.
pub(crate) struct Node<C> {
    pub(crate) name: String,
    pub(crate) parent: Option<StateId>,
    pub(crate) entry: Option<StateAction<C>>,
    pub(crate) exit: Option<StateAction<C>>,
    pub(crate) end_state: bool,
    pub(crate) responses: HashMap<String, Vec<Response<C>>>,
    pub(crate) kind: StateKind<C>,
}

impl<C> Node<C> {
    pub(crate) fn root(name: String) -> Self {
        Self {
            name,
            parent: None,
            entry: None,
            exit: None,
            end_state: false,
            responses: HashMap::new(),
            kind: StateKind::Composite(Composite::new(None, None)),
        }
    }

    pub(crate) fn leaf(state: State<C>, parent: StateId) -> Self {
        Self {
            name: state.name,
            parent: Some(parent),
            entry: state.entry,
            exit: state.exit,
            end_state: state.end_state,
            responses: HashMap::new(),
            kind: StateKind::Leaf,
        }
    }

    pub(crate) fn composite(definition: CompositeState<C>, parent: StateId) -> Self {
        let mut node = Self::leaf(definition.state, parent);
        node.kind = StateKind::Composite(Composite::new(definition.initial_action, definition.end_action));
        node
    }

    pub(crate) fn as_composite(&self) -> Option<&Composite<C>> {
        match &self.kind {
            StateKind::Composite(composite) => Some(composite),
            StateKind::Leaf => None,
        }
    }

    pub(crate) fn as_composite_mut(&mut self) -> Option<&mut Composite<C>> {
        match &mut self.kind {
            StateKind::Composite(composite) => Some(composite),
            StateKind::Leaf => None,
        }
    }

    pub(crate) fn is_composite(&self) -> bool {
        matches!(self.kind, StateKind::Composite(_))
    }

    pub(crate) fn responses_for(&self, event: &str) -> &[Response<C>] {
        self.responses
            .get(event)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn add_response(&mut self, event: &Event, response: Response<C>) {
        self.responses
            .entry(event.name().to_string())
            .or_default()
            .push(response);
    }

    pub(crate) fn run_entry(&self, ctx: &mut C) -> ActionResult {
        match &self.entry {
            Some(action) => action(ctx),
            None => Ok(()),
        }
    }

    pub(crate) fn run_exit(&self, ctx: &mut C) -> ActionResult {
        match &self.exit {
            Some(action) => action(ctx),
            None => Ok(()),
        }
    }
}

/// A response target must be registered under the same parent as its owner.
pub(crate) fn target_in_scope<C>(nodes: &[Node<C>], owner: StateId, target: StateId) -> bool {
    let (Some(owner), Some(target)) = (nodes.get(owner.index()), nodes.get(target.index())) else {
        return false;
    };
    owner.parent.is_some() && owner.parent == target.parent
}

/// Display name for a state id, falling back to the raw id when unknown.
pub(crate) fn label<C>(nodes: &[Node<C>], id: StateId) -> String {
    nodes
        .get(id.index())
        .map_or_else(|| id.to_string(), |node| node.name.clone())
}
