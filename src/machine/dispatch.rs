//! Event dispatch: flat response selection and hierarchical delegation.

use super::node::target_in_scope;
use super::{Machine, MachineError};
use crate::core::{Event, StateId, StateTransition};
use chrono::Utc;
use tracing::{debug, debug_span, trace};

/// Result of dispatching one event at the top level
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The event was consumed; carries the active leaf afterwards.
    /// A self-transition reports the same leaf it started from.
    Transitioned(StateId),

    /// Responses exist for the event but every guard declined
    Declined,

    /// No state in the active chain responds to the event
    Unhandled,
}

impl Outcome {
    /// The active leaf after a consumed event, `None` when unconsumed.
    pub fn state(self) -> Option<StateId> {
        match self {
            Outcome::Transitioned(state) => Some(state),
            Outcome::Declined | Outcome::Unhandled => None,
        }
    }

    pub fn is_consumed(self) -> bool {
        matches!(self, Outcome::Transitioned(_))
    }
}

/// Result of offering an event to one state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Unhandled,
    Declined,
    /// Consumed below this state; it stays active in its parent.
    Stayed,
    /// This state took one of its own responses; the parent adopts the target.
    Moved(StateId),
}

impl<C> Machine<C> {
    /// Dispatch an event and report the active leaf.
    ///
    /// Returns `Ok(None)` when the event is not consumed, either because no
    /// response exists or because every guard declined. A self-transition
    /// returns `Ok(Some(current))`.
    ///
    /// # Errors
    ///
    /// Fails with `MachineError::UnregisteredState` before any action runs if
    /// the selected response targets a state outside its owner's scope, and
    /// with `MachineError::Action` when an application callable fails. A
    /// failing transition action or entry action is not rolled back: the exit
    /// action has already run and the active state is left unchanged, so the
    /// machine is "exited but not entered". Compensation is up to the
    /// application's own exit logic.
    pub fn handle_event(&mut self, event: &Event, ctx: &mut C) -> Result<Option<StateId>, MachineError> {
        Ok(self.dispatch(event, ctx)?.state())
    }

    /// Dispatch an event, distinguishing why an event was not consumed.
    ///
    /// Same failure behavior as [`Machine::handle_event`].
    pub fn dispatch(&mut self, event: &Event, ctx: &mut C) -> Result<Outcome, MachineError> {
        let span = debug_span!("dispatch", machine = %self.name(), event = %event.name());
        let _entered = span.enter();

        let from = self.current();
        let outcome = match self.dispatch_at(StateId::ROOT, event, ctx)? {
            Step::Unhandled => Outcome::Unhandled,
            Step::Declined => Outcome::Declined,
            Step::Stayed | Step::Moved(_) => Outcome::Transitioned(self.current()),
        };

        match outcome {
            Outcome::Transitioned(to) => {
                debug!(from = %self.label(from), to = %self.label(to), "Event consumed");
                if self.options.record_history {
                    self.history.record(StateTransition {
                        from,
                        to,
                        event: event.name().to_string(),
                        timestamp: Utc::now(),
                    });
                }
            }
            _ => trace!(state = %self.label(from), ?outcome, "Event not consumed"),
        }

        Ok(outcome)
    }

    /// Offer the event to `id`. Composites delegate to their current child
    /// first and fall back to their own responses when the child does not
    /// consume it.
    fn dispatch_at(&mut self, id: StateId, event: &Event, ctx: &mut C) -> Result<Step, MachineError> {
        if !self.node(id)?.is_composite() {
            return self.fire(id, event, ctx);
        }

        self.start_composite(id, ctx)?;
        let child = self.active_child(id)?;

        match self.dispatch_at(child, event, ctx)? {
            Step::Moved(next) => {
                if let Some(composite) = self.node_mut(id)?.as_composite_mut() {
                    composite.current = Some(next);
                }
                self.settle(id, ctx)?;
                Ok(Step::Stayed)
            }
            Step::Stayed => {
                self.settle(id, ctx)?;
                Ok(Step::Stayed)
            }
            inner => {
                trace!(composite = %self.label(id), "Bubbling event to composite");
                let own = self.fire(id, event, ctx)?;
                Ok(match (inner, own) {
                    (Step::Declined, Step::Unhandled) => Step::Declined,
                    (_, own) => own,
                })
            }
        }
    }

    /// Flat dispatch against the responses registered on `id`.
    fn fire(&self, id: StateId, event: &Event, ctx: &mut C) -> Result<Step, MachineError> {
        let node = self.node(id)?;
        let candidates = node.responses_for(event.name());
        if candidates.is_empty() {
            return Ok(Step::Unhandled);
        }

        let Some(response) = candidates.iter().find(|r| r.is_eligible(&*ctx)) else {
            trace!(state = %node.name, candidates = candidates.len(), "All guards declined");
            return Ok(Step::Declined);
        };

        let target = response.target();
        if !target_in_scope(&self.nodes, id, target) {
            return Err(MachineError::UnregisteredState {
                target: self.label(target),
                owner: node.name.clone(),
            });
        }

        node.run_exit(ctx).map_err(MachineError::Action)?;
        response.run_action(ctx, event).map_err(MachineError::Action)?;
        self.node(target)?
            .run_entry(ctx)
            .map_err(MachineError::Action)?;

        debug!(from = %node.name, to = %self.label(target), "Transition taken");
        Ok(Step::Moved(target))
    }

    /// Run the initial action the first time a composite takes part in
    /// dispatch. A failing initial action leaves the composite unstarted.
    pub(crate) fn start_composite(&mut self, id: StateId, ctx: &mut C) -> Result<(), MachineError> {
        let node = self.node(id)?;
        let Some(composite) = node.as_composite() else {
            return Ok(());
        };
        if composite.started {
            return Ok(());
        }
        if let Some(action) = &composite.initial_action {
            action(ctx).map_err(MachineError::Action)?;
        }
        debug!(composite = %node.name, "Composite started");

        if let Some(composite) = self.node_mut(id)?.as_composite_mut() {
            composite.started = true;
        }
        Ok(())
    }

    /// Run the end action once per arrival of the composite's active
    /// configuration at an end state.
    pub(crate) fn finish_composite(&mut self, id: StateId, ctx: &mut C) -> Result<(), MachineError> {
        let node = self.node(id)?;
        let Some(composite) = node.as_composite() else {
            return Ok(());
        };
        if composite.ended {
            return Ok(());
        }
        if let Some(action) = &composite.end_action {
            action(ctx).map_err(MachineError::Action)?;
        }
        debug!(composite = %node.name, "Composite reached end state");

        if let Some(composite) = self.node_mut(id)?.as_composite_mut() {
            composite.ended = true;
        }
        Ok(())
    }

    /// Re-arm the end action after a consumed event below `id`, then run it
    /// if the event left an end state active under this composite.
    fn settle(&mut self, id: StateId, ctx: &mut C) -> Result<(), MachineError> {
        let reached_end = self.reaches_end(id);
        if let Some(composite) = self.node_mut(id)?.as_composite_mut() {
            composite.ended = false;
        }
        if reached_end {
            self.finish_composite(id, ctx)?;
        }
        Ok(())
    }

    fn active_child(&self, id: StateId) -> Result<StateId, MachineError> {
        self.current_child(id)
            .ok_or_else(|| MachineError::NoActiveChild(self.label(id)))
    }
}
