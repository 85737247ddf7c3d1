//! Document Review Workflow
//!
//! This example demonstrates a hierarchical machine driven actively.
//!
//! Key concepts:
//! - A composite state with its own initial and end actions
//! - Guards choosing between competing responses for one event
//! - Events bubbling from a child to its enclosing composite
//! - An end state inside a composite finishing the whole run
//!
//! Run with: cargo run --example document_review
//! Set `RUST_LOG=hsmkit=debug` to see the engine's own trace.

use hsmkit::builder::MachineBuilder;
use hsmkit::core::{CompositeState, Event, Response, State};
use hsmkit::machine::UnhandledStrategy;

#[derive(Default)]
struct Document {
    approvals: u32,
    required: u32,
    log: Vec<String>,
}

impl Document {
    fn note(&mut self, line: impl Into<String>) {
        let line = line.into();
        println!("  {line}");
        self.log.push(line);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "hsmkit=warn".to_string()))
        .init();

    println!("=== Document Review Workflow ===\n");

    let mut builder = MachineBuilder::<Document>::new("review")
        .on_initial(|doc: &mut Document| {
            doc.note("workflow opened");
            Ok(())
        })
        .on_end(|doc: &mut Document| {
            doc.note(format!("workflow closed after {} approvals", doc.approvals));
            Ok(())
        })
        .on_unhandled(UnhandledStrategy::IgnoreAndLog);
    let root = builder.root();

    let draft = builder.add_state(root, State::new("Draft")).unwrap();
    let review = builder
        .add_composite(
            root,
            CompositeState::new("InReview")
                .on_initial(|doc: &mut Document| {
                    doc.note("review round started");
                    Ok(())
                })
                .on_end(|doc: &mut Document| {
                    doc.note("reviewers reached a verdict");
                    Ok(())
                })
                .on_exit(|doc: &mut Document| {
                    doc.note("sent back to draft");
                    Ok(())
                }),
        )
        .unwrap();
    let pending = builder.add_state(review, State::new("Pending")).unwrap();
    let accepted = builder
        .add_state(review, State::new("Accepted").end_state())
        .unwrap();

    builder.add_response(draft, "submit", Response::to(review)).unwrap();

    // The first eligible response wins: approve stays pending until enough
    // approvals have been collected.
    builder
        .add_response(
            pending,
            "approve",
            Response::to(accepted)
                .when(|doc: &Document| doc.approvals + 1 >= doc.required)
                .action(|doc: &mut Document, _: &Event| {
                    doc.approvals += 1;
                    doc.note("final approval received");
                    Ok(())
                }),
        )
        .unwrap();
    builder
        .add_response(
            pending,
            "approve",
            Response::to(pending).action(|doc: &mut Document, event: &Event| {
                doc.approvals += 1;
                let reviewer = event.param(0).and_then(|v| v.as_str()).unwrap_or("someone");
                doc.note(format!("approval from {reviewer}"));
                Ok(())
            }),
        )
        .unwrap();

    builder.add_response(review, "reject", Response::to(draft)).unwrap();

    let mut machine = builder.build().unwrap();
    let mut doc = Document {
        required: 2,
        ..Document::default()
    };

    // The last event is never pulled: accepting the document ends the run.
    let events = vec![
        Event::new("approve"),
        Event::new("submit"),
        Event::new("approve").with_param(serde_json::json!("alice")),
        Event::new("reject"),
        Event::new("submit"),
        Event::new("approve").with_param(serde_json::json!("bob")),
        Event::new("archive"),
    ];

    println!("Running workflow:");
    let summary = machine.run(events, &mut doc).unwrap();

    println!("\nRun summary:");
    println!("  events pulled: {}", summary.events);
    println!("  transitions:   {}", summary.transitions);
    println!("  ignored:       {}", summary.ignored);
    println!("  finished:      {}", summary.finished);
    println!("  final state:   {}", machine.current_name());
    println!("  notes written: {}", doc.log.len());

    println!("\nPath taken:");
    let path: Vec<_> = machine
        .history()
        .get_path()
        .into_iter()
        .filter_map(|id| machine.state_name(id))
        .collect();
    println!("  {}", path.join(" -> "));

    println!("\n=== Example Complete ===");
}
