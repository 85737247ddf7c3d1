//! A machine and its context behind one lock, for concurrent hosts.

use super::dispatch::Outcome;
use super::{Machine, MachineError, RunSummary};
use crate::core::{Event, StateId};
use parking_lot::Mutex;
use std::sync::Arc;

struct Bound<C> {
    machine: Machine<C>,
    ctx: C,
}

/// Cloneable handle serializing all access to one machine.
///
/// The machine and its context share a single mutex, so a dispatch runs to
/// completion (exit, action, entry, through every nested composite) before
/// any other caller can observe or drive the machine.
///
/// # Example
///
/// ```rust
/// use hsmkit::builder::MachineBuilder;
/// use hsmkit::core::{Event, Response, State};
/// use hsmkit::machine::SharedMachine;
///
/// let mut builder = MachineBuilder::<u32>::new("counter");
/// let idle = builder.add_state(builder.root(), State::new("Idle")).unwrap();
/// builder
///     .add_response(
///         idle,
///         "tick",
///         Response::to(idle).action(|n: &mut u32, _: &Event| {
///             *n += 1;
///             Ok(())
///         }),
///     )
///     .unwrap();
///
/// let shared = SharedMachine::new(builder.build().unwrap(), 0);
/// let worker = shared.clone();
/// std::thread::spawn(move || worker.handle_event(&Event::new("tick")))
///     .join()
///     .unwrap()
///     .unwrap();
///
/// assert_eq!(shared.with(|_, n| *n), 1);
/// ```
pub struct SharedMachine<C> {
    inner: Arc<Mutex<Bound<C>>>,
}

impl<C> Clone for SharedMachine<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> SharedMachine<C> {
    pub fn new(machine: Machine<C>, ctx: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Bound { machine, ctx })),
        }
    }

    pub fn handle_event(&self, event: &Event) -> Result<Option<StateId>, MachineError> {
        let mut guard = self.inner.lock();
        let Bound { machine, ctx } = &mut *guard;
        machine.handle_event(event, ctx)
    }

    pub fn dispatch(&self, event: &Event) -> Result<Outcome, MachineError> {
        let mut guard = self.inner.lock();
        let Bound { machine, ctx } = &mut *guard;
        machine.dispatch(event, ctx)
    }

    /// Run an event source while holding the lock for the whole run.
    pub fn run<I>(&self, events: I) -> Result<RunSummary, MachineError>
    where
        I: IntoIterator<Item = Event>,
    {
        let mut guard = self.inner.lock();
        let Bound { machine, ctx } = &mut *guard;
        machine.run(events, ctx)
    }

    /// Access the machine and context under the lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut Machine<C>, &mut C) -> R) -> R {
        let mut guard = self.inner.lock();
        let Bound { machine, ctx } = &mut *guard;
        f(machine, ctx)
    }

    pub fn current(&self) -> StateId {
        self.inner.lock().machine.current()
    }

    pub fn current_name(&self) -> String {
        self.inner.lock().machine.current_name().to_string()
    }

    /// Recover the machine and context once no other handle remains.
    pub fn into_inner(self) -> Option<(Machine<C>, C)> {
        Arc::try_unwrap(self.inner).ok().map(|mutex| {
            let bound = mutex.into_inner();
            (bound.machine, bound.ctx)
        })
    }
}
