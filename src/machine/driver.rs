//! Active driving: the machine pulls events from a source.

use super::dispatch::Outcome;
use super::{Machine, MachineError, UnhandledStrategy};
use crate::core::{Event, StateId};
use tracing::{debug, warn};

/// Summary of an active run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Events pulled from the source
    pub events: usize,
    /// Events that were consumed
    pub transitions: usize,
    /// Events whose candidates were all declined by guards
    pub declined: usize,
    /// Unhandled events skipped under `UnhandledStrategy::IgnoreAndLog`
    pub ignored: usize,
    /// Whether the run stopped on an end state
    pub finished: bool,
}

impl<C> Machine<C> {
    /// Drive the machine from an event source.
    ///
    /// The root's initial action runs before the first event. Events are
    /// pulled lazily, one per iteration, until the active state is an end
    /// state (at any nesting depth) or the source is exhausted; events left in
    /// the source are not consumed. On stopping at an end state the root's end
    /// action runs, unless it already ran for that arrival during dispatch.
    ///
    /// # Errors
    ///
    /// Any dispatch error stops the run. An event that no state in the active
    /// chain responds to fails with `MachineError::UnhandledEvent` unless the
    /// machine was built with `UnhandledStrategy::IgnoreAndLog`. Events
    /// declined by guards never fail the run.
    pub fn run<I>(&mut self, events: I, ctx: &mut C) -> Result<RunSummary, MachineError>
    where
        I: IntoIterator<Item = Event>,
    {
        self.start_composite(StateId::ROOT, ctx)?;

        let mut summary = RunSummary::default();
        let mut events = events.into_iter();

        while !self.is_finished() {
            let Some(event) = events.next() else {
                break;
            };
            summary.events += 1;

            match self.dispatch(&event, ctx)? {
                Outcome::Transitioned(_) => summary.transitions += 1,
                Outcome::Declined => summary.declined += 1,
                Outcome::Unhandled => match self.options.on_unhandled {
                    UnhandledStrategy::Fail => {
                        return Err(MachineError::UnhandledEvent {
                            state: self.current_name().to_string(),
                            event: event.name().to_string(),
                        });
                    }
                    UnhandledStrategy::IgnoreAndLog => {
                        warn!(
                            machine = %self.name(),
                            state = %self.current_name(),
                            event = %event.name(),
                            "Ignoring unhandled event"
                        );
                        summary.ignored += 1;
                    }
                },
            }
        }

        if self.is_finished() {
            self.finish_composite(StateId::ROOT, ctx)?;
            summary.finished = true;
        }

        debug!(
            machine = %self.name(),
            events = summary.events,
            transitions = summary.transitions,
            finished = summary.finished,
            "Run stopped"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MachineBuilder;
    use crate::core::{Response, State};

    #[derive(Default)]
    struct Ctx {
        started: u32,
        ended: u32,
        ready: bool,
    }

    fn line(strategy: UnhandledStrategy) -> Machine<Ctx> {
        let mut builder = MachineBuilder::<Ctx>::new("line")
            .on_initial(|c: &mut Ctx| {
                c.started += 1;
                Ok(())
            })
            .on_end(|c: &mut Ctx| {
                c.ended += 1;
                Ok(())
            })
            .on_unhandled(strategy);
        let root = builder.root();
        let a = builder.add_state(root, State::new("A")).unwrap();
        let b = builder.add_state(root, State::new("B")).unwrap();
        let c = builder.add_state(root, State::new("C").end_state()).unwrap();
        builder.add_response(a, "next", Response::to(b)).unwrap();
        builder
            .add_response(b, "next", Response::to(c).when(|ctx: &Ctx| ctx.ready))
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn run_stops_at_end_state() {
        let mut machine = line(UnhandledStrategy::Fail);
        let mut ctx = Ctx {
            ready: true,
            ..Ctx::default()
        };

        let events = ["next", "next", "next", "next"].map(Event::new);
        let summary = machine.run(events, &mut ctx).unwrap();

        assert_eq!(summary.events, 2);
        assert_eq!(summary.transitions, 2);
        assert!(summary.finished);
        assert_eq!(machine.current_name(), "C");
        assert_eq!(ctx.started, 1);
        assert_eq!(ctx.ended, 1);
    }

    #[test]
    fn run_ends_when_source_is_exhausted() {
        let mut machine = line(UnhandledStrategy::Fail);
        let mut ctx = Ctx::default();

        let summary = machine.run(vec![Event::new("next")], &mut ctx).unwrap();

        assert_eq!(summary.transitions, 1);
        assert!(!summary.finished);
        assert_eq!(machine.current_name(), "B");
        assert_eq!(ctx.started, 1);
        assert_eq!(ctx.ended, 0);
    }

    #[test]
    fn declined_guard_does_not_fail_run() {
        let mut machine = line(UnhandledStrategy::Fail);
        let mut ctx = Ctx::default();

        let summary = machine
            .run(vec![Event::new("next"), Event::new("next")], &mut ctx)
            .unwrap();

        assert_eq!(summary.declined, 1);
        assert_eq!(machine.current_name(), "B");
    }

    #[test]
    fn unhandled_event_fails_run() {
        let mut machine = line(UnhandledStrategy::Fail);
        let mut ctx = Ctx::default();

        let err = machine
            .run(vec![Event::new("next"), Event::new("jump")], &mut ctx)
            .unwrap_err();

        match err {
            MachineError::UnhandledEvent { state, event } => {
                assert_eq!(state, "B");
                assert_eq!(event, "jump");
            }
            other => panic!("Expected UnhandledEvent, got {other:?}"),
        }
    }

    #[test]
    fn unhandled_event_can_be_ignored() {
        let mut machine = line(UnhandledStrategy::IgnoreAndLog);
        let mut ctx = Ctx {
            ready: true,
            ..Ctx::default()
        };

        let events = ["jump", "next", "jump", "next"].map(Event::new);
        let summary = machine.run(events, &mut ctx).unwrap();

        assert_eq!(summary.ignored, 2);
        assert!(summary.finished);
    }

    #[test]
    fn run_pulls_events_lazily() {
        let mut machine = line(UnhandledStrategy::Fail);
        let mut ctx = Ctx {
            ready: true,
            ..Ctx::default()
        };
        let mut pulled = 0;

        let source = std::iter::repeat_with(|| {
            pulled += 1;
            Event::new("next")
        });
        machine.run(source, &mut ctx).unwrap();

        assert_eq!(pulled, 2);
    }

    #[test]
    fn run_stops_at_nested_end_state() {
        let mut builder = MachineBuilder::<Ctx>::new("nested").on_end(|c: &mut Ctx| {
            c.ended += 1;
            Ok(())
        });
        let outer = builder
            .add_composite(builder.root(), crate::core::CompositeState::new("Outer"))
            .unwrap();
        let one = builder.add_state(outer, State::new("One")).unwrap();
        let fin = builder.add_state(outer, State::new("Fin").end_state()).unwrap();
        builder.add_response(one, "finish", Response::to(fin)).unwrap();
        let mut machine = builder.build().unwrap();
        let mut ctx = Ctx::default();

        let events = ["finish", "x", "y"].map(Event::new);
        let summary = machine.run(events, &mut ctx).unwrap();

        assert_eq!(summary.events, 1);
        assert!(summary.finished);
        assert_eq!(machine.current(), fin);
        assert!(machine.is_finished());
        assert_eq!(ctx.ended, 1);
    }

    #[test]
    fn run_on_initial_end_state_fires_end_action() {
        let mut builder = MachineBuilder::<Ctx>::new("instant").on_end(|c: &mut Ctx| {
            c.ended += 1;
            Ok(())
        });
        builder
            .add_state(builder.root(), State::new("Done").end_state())
            .unwrap();
        let mut machine = builder.build().unwrap();
        let mut ctx = Ctx::default();

        let summary = machine.run(vec![Event::new("anything")], &mut ctx).unwrap();
        machine.run(Vec::new(), &mut ctx).unwrap();

        assert_eq!(summary.events, 0);
        assert!(summary.finished);
        assert_eq!(ctx.ended, 1);
    }
}
