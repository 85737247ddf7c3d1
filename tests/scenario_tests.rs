//! End-to-end scenarios for flat and hierarchical machines.

use hsmkit::builder::{BuildError, MachineBuilder};
use hsmkit::core::{ActionResult, CompositeState, Event, Response, State};
use hsmkit::machine::{MachineError, Outcome};
use std::fmt;

#[derive(Default)]
struct Log {
    lines: Vec<String>,
    allow_first: bool,
    allow_second: bool,
}

fn push(line: &'static str) -> impl Fn(&mut Log) -> ActionResult {
    move |log: &mut Log| {
        log.lines.push(line.to_string());
        Ok(())
    }
}

#[derive(Debug)]
struct Jammed;

impl fmt::Display for Jammed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("door jammed")
    }
}

impl std::error::Error for Jammed {}

#[test]
fn round_trip_yields_observed_sequence() {
    let mut builder = MachineBuilder::<Log>::new("pair");
    let root = builder.root();
    let a = builder.add_state(root, State::new("A")).unwrap();
    let b = builder.add_state(root, State::new("B")).unwrap();
    builder.add_response(a, "go", Response::to(b)).unwrap();
    builder.add_response(b, "back", Response::to(a)).unwrap();
    let mut machine = builder.build().unwrap();
    let mut log = Log::default();

    let events = ["go", "back", "go"].map(Event::new);
    let summary = machine.run(events, &mut log).unwrap();

    assert_eq!(summary.transitions, 3);
    assert!(!summary.finished);
    assert_eq!(machine.history().get_path(), vec![a, b, a, b]);
}

#[test]
fn finishing_scenario_halts_and_ends_once() {
    let mut builder = MachineBuilder::<Log>::new("task").on_end(push("end"));
    let root = builder.root();
    let a = builder
        .add_state(root, State::new("A").on_entry(push("enter A")))
        .unwrap();
    let b = builder.add_state(root, State::new("B").end_state()).unwrap();
    builder.add_response(a, "finish", Response::to(b)).unwrap();
    let mut machine = builder.build().unwrap();
    let mut log = Log::default();

    let result = machine.handle_event(&Event::new("finish"), &mut log).unwrap();
    assert_eq!(result, Some(b));

    let summary = machine
        .run(["finish", "other", "more"].map(Event::new), &mut log)
        .unwrap();

    assert_eq!(summary.events, 0);
    assert!(summary.finished);
    assert_eq!(log.lines, vec!["end"]);
}

#[test]
fn first_passing_guard_wins() {
    let mut builder = MachineBuilder::<Log>::new("guards");
    let root = builder.root();
    let start = builder.add_state(root, State::new("Start")).unwrap();
    let first = builder.add_state(root, State::new("First")).unwrap();
    let second = builder.add_state(root, State::new("Second")).unwrap();
    builder
        .add_response(
            start,
            "pick",
            Response::to(first)
                .when(|l: &Log| l.allow_first)
                .action(|l: &mut Log, _: &Event| {
                    l.lines.push("first action".to_string());
                    Ok(())
                }),
        )
        .unwrap();
    builder
        .add_response(
            start,
            "pick",
            Response::to(second)
                .when(|l: &Log| l.allow_second)
                .action(|l: &mut Log, _: &Event| {
                    l.lines.push("second action".to_string());
                    Ok(())
                }),
        )
        .unwrap();
    let mut machine = builder.build().unwrap();
    let mut log = Log {
        allow_second: true,
        ..Log::default()
    };

    let result = machine.handle_event(&Event::new("pick"), &mut log).unwrap();

    assert_eq!(result, Some(second));
    assert_eq!(log.lines, vec!["second action"]);
}

#[test]
fn failed_guard_does_not_fall_through_to_other_events() {
    let mut builder = MachineBuilder::<Log>::new("guards");
    let root = builder.root();
    let start = builder.add_state(root, State::new("Start")).unwrap();
    let other = builder.add_state(root, State::new("Other")).unwrap();
    builder
        .add_response(start, "pick", Response::to(other).when(|l: &Log| l.allow_first))
        .unwrap();
    builder.add_response(start, "other", Response::to(other)).unwrap();
    let mut machine = builder.build().unwrap();

    let outcome = machine
        .dispatch(&Event::new("pick"), &mut Log::default())
        .unwrap();

    assert_eq!(outcome, Outcome::Declined);
    assert_eq!(machine.current(), start);
}

#[test]
fn bubbling_moves_composite_and_reports_its_target() {
    let mut builder = MachineBuilder::<Log>::new("atm");
    let root = builder.root();
    let session = builder
        .add_composite(
            root,
            CompositeState::new("Session")
                .on_initial(push("session start"))
                .on_exit(push("exit Session")),
        )
        .unwrap();
    let pin = builder.add_state(session, State::new("Pin")).unwrap();
    let menu = builder.add_state(session, State::new("Menu")).unwrap();
    let idle = builder
        .add_state(root, State::new("Idle").on_entry(push("enter Idle")))
        .unwrap();
    builder.add_response(pin, "pin_ok", Response::to(menu)).unwrap();
    builder.add_response(session, "cancel", Response::to(idle)).unwrap();
    let mut machine = builder.build().unwrap();
    let mut log = Log::default();

    assert_eq!(
        machine.handle_event(&Event::new("pin_ok"), &mut log).unwrap(),
        Some(menu)
    );
    assert_eq!(
        machine.handle_event(&Event::new("cancel"), &mut log).unwrap(),
        Some(idle)
    );
    assert_eq!(machine.active_path(), vec![idle]);
    assert_eq!(
        log.lines,
        vec!["session start", "exit Session", "enter Idle"]
    );
}

#[test]
fn nested_end_state_propagates_to_machine() {
    let mut builder = MachineBuilder::<Log>::new("wizard").on_end(push("wizard done"));
    let root = builder.root();
    let steps = builder
        .add_composite(root, CompositeState::new("Steps").on_end(push("steps done")))
        .unwrap();
    let one = builder.add_state(steps, State::new("One")).unwrap();
    let done = builder
        .add_state(steps, State::new("StepsDone").end_state())
        .unwrap();
    let review = builder.add_state(root, State::new("Review")).unwrap();
    builder.add_response(one, "next", Response::to(done)).unwrap();
    builder.add_response(steps, "submit", Response::to(review)).unwrap();
    let mut machine = builder.build().unwrap();
    let mut log = Log::default();

    machine.handle_event(&Event::new("next"), &mut log).unwrap();
    assert_eq!(machine.current(), done);
    assert!(machine.is_finished());
    assert_eq!(log.lines, vec!["steps done", "wizard done"]);

    machine.handle_event(&Event::new("submit"), &mut log).unwrap();

    assert_eq!(machine.current(), review);
    assert!(!machine.is_finished());
    assert_eq!(log.lines.len(), 2);
}

#[test]
fn run_halts_once_nested_end_state_is_reached() {
    let mut builder = MachineBuilder::<Log>::new("outer").on_end(push("machine end"));
    let root = builder.root();
    let outer = builder
        .add_composite(root, CompositeState::new("Outer").on_end(push("outer end")))
        .unwrap();
    let one = builder.add_state(outer, State::new("One")).unwrap();
    let fin = builder.add_state(outer, State::new("Fin").end_state()).unwrap();
    builder.add_response(one, "finish", Response::to(fin)).unwrap();
    let mut machine = builder.build().unwrap();
    let mut log = Log::default();

    let summary = machine
        .run(["finish", "x", "y"].map(Event::new), &mut log)
        .unwrap();

    assert_eq!(summary.events, 1);
    assert!(summary.finished);
    assert_eq!(machine.current(), fin);
    assert_eq!(log.lines, vec!["outer end", "machine end"]);
}

#[test]
fn nested_composites_delegate_at_every_depth() {
    let mut builder = MachineBuilder::<Log>::new("deep");
    let root = builder.root();
    let outer = builder.add_composite(root, CompositeState::new("Outer")).unwrap();
    let inner = builder.add_composite(outer, CompositeState::new("Inner")).unwrap();
    let leaf_a = builder.add_state(inner, State::new("LeafA")).unwrap();
    let leaf_b = builder.add_state(inner, State::new("LeafB")).unwrap();
    let side = builder.add_state(outer, State::new("Side")).unwrap();
    let out = builder.add_state(root, State::new("Out")).unwrap();
    builder.add_response(leaf_a, "step", Response::to(leaf_b)).unwrap();
    builder.add_response(inner, "leave", Response::to(side)).unwrap();
    builder.add_response(outer, "quit", Response::to(out)).unwrap();
    let mut machine = builder.build().unwrap();
    let mut log = Log::default();

    assert_eq!(machine.active_path(), vec![outer, inner, leaf_a]);

    machine.handle_event(&Event::new("step"), &mut log).unwrap();
    assert_eq!(machine.active_path(), vec![outer, inner, leaf_b]);

    machine.handle_event(&Event::new("leave"), &mut log).unwrap();
    assert_eq!(machine.active_path(), vec![outer, side]);

    machine.handle_event(&Event::new("quit"), &mut log).unwrap();
    assert_eq!(machine.active_path(), vec![out]);
    assert!(machine.is_started(outer));
    assert!(machine.is_started(inner));
}

#[test]
fn reentered_composite_resumes_its_last_child() {
    let mut builder = MachineBuilder::<Log>::new("resume");
    let root = builder.root();
    let work = builder.add_composite(root, CompositeState::new("Work")).unwrap();
    let draft = builder.add_state(work, State::new("Draft")).unwrap();
    let final_ = builder.add_state(work, State::new("Final")).unwrap();
    let pause = builder.add_state(root, State::new("Pause")).unwrap();
    builder.add_response(draft, "polish", Response::to(final_)).unwrap();
    builder.add_response(work, "pause", Response::to(pause)).unwrap();
    builder.add_response(pause, "resume", Response::to(work)).unwrap();
    let mut machine = builder.build().unwrap();

    let events = ["polish", "pause", "resume"].map(Event::new);
    machine.run(events, &mut Log::default()).unwrap();

    assert_eq!(machine.current(), final_);
}

#[test]
fn action_error_propagates_without_rollback() {
    let mut builder = MachineBuilder::<Log>::new("door");
    let root = builder.root();
    let open = builder
        .add_state(root, State::new("Open").on_exit(push("exit Open")))
        .unwrap();
    let shut = builder
        .add_state(root, State::new("Shut").on_entry(push("enter Shut")))
        .unwrap();
    builder
        .add_response(
            open,
            "close",
            Response::to(shut).action(|_: &mut Log, _: &Event| Err(Jammed.into())),
        )
        .unwrap();
    let mut machine = builder.build().unwrap();
    let mut log = Log::default();

    let err = machine
        .handle_event(&Event::new("close"), &mut log)
        .unwrap_err();

    match err {
        MachineError::Action(source) => {
            assert!(source.downcast_ref::<Jammed>().is_some());
            assert_eq!(source.to_string(), "door jammed");
        }
        other => panic!("Expected Action error, got {other:?}"),
    }
    assert_eq!(log.lines, vec!["exit Open"]);
    assert_eq!(machine.current(), open);
    assert!(machine.history().is_empty());
}

#[test]
fn guard_is_not_consulted_for_other_states() {
    let mut builder = MachineBuilder::<Log>::new("scoped");
    let root = builder.root();
    let a = builder.add_state(root, State::new("A")).unwrap();
    let b = builder.add_state(root, State::new("B")).unwrap();
    builder.add_response(b, "go", Response::to(a)).unwrap();
    let mut machine = builder.build().unwrap();

    let outcome = machine.dispatch(&Event::new("go"), &mut Log::default()).unwrap();

    assert_eq!(outcome, Outcome::Unhandled);
    assert_eq!(machine.current(), a);
}

#[test]
fn duplicate_state_names_are_rejected() {
    let mut builder = MachineBuilder::<Log>::new("dups");
    builder.add_state(builder.root(), State::new("Same")).unwrap();

    let err = builder
        .add_state(builder.root(), State::new("Same"))
        .unwrap_err();

    assert!(matches!(err, BuildError::DuplicateState(name) if name == "Same"));
}
