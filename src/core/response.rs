//! Candidate transitions bound to one event in one state.

use crate::core::action::{ActionResult, TransitionAction};
use crate::core::{Event, Guard, StateId};
use std::fmt;

/// A candidate transition: target state, optional action, optional guard.
///
/// Responses are registered on an owning state for one event name and are
/// never mutated afterwards. Several responses for the same event form an
/// ordered candidate list.
///
/// # Example
///
/// ```rust
/// use hsmkit::builder::MachineBuilder;
/// use hsmkit::core::{Event, Response, State};
///
/// struct Counter {
///     hits: u32,
/// }
///
/// let mut builder = MachineBuilder::<Counter>::new("counter");
/// let idle = builder.add_state(builder.root(), State::new("Idle")).unwrap();
/// let busy = builder.add_state(builder.root(), State::new("Busy")).unwrap();
///
/// let response = Response::to(busy)
///     .when(|c: &Counter| c.hits < 3)
///     .action(|c: &mut Counter, _event: &Event| {
///         c.hits += 1;
///         Ok(())
///     });
///
/// assert_eq!(response.target(), busy);
/// builder.add_response(idle, "work", response).unwrap();
/// ```
pub struct Response<C> {
    target: StateId,
    action: Option<TransitionAction<C>>,
    guard: Option<Guard<C>>,
}

impl<C> Response<C> {
    /// Unconditional response moving to `target` without an action.
    pub fn to(target: StateId) -> Self {
        Self {
            target,
            action: None,
            guard: None,
        }
    }

    /// Attach the transition action.
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C, &Event) -> ActionResult + Send + Sync + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Attach a pre-built guard.
    pub fn guard(mut self, guard: Guard<C>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Attach a guard using a closure.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    pub fn target(&self) -> StateId {
        self.target
    }

    pub fn has_guard(&self) -> bool {
        self.guard.is_some()
    }

    /// Check whether this candidate may fire. A missing guard always permits.
    pub fn is_eligible(&self, ctx: &C) -> bool {
        self.guard.as_ref().is_none_or(|g| g.check(ctx))
    }

    pub(crate) fn run_action(&self, ctx: &mut C, event: &Event) -> ActionResult {
        match &self.action {
            Some(action) => action(ctx, event),
            None => Ok(()),
        }
    }
}

impl<C> fmt::Debug for Response<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("target", &self.target)
            .field("has_action", &self.action.is_some())
            .field("has_guard", &self.guard.is_some())
            .finish()
    }
}
