//! Hsmkit: a hierarchical state machine engine
//!
//! States respond to named events through ordered, optionally guarded
//! responses. Composite states nest a sub-machine: an event is offered to the
//! active child first and bubbles up to the composite when the child does not
//! consume it.
//!
//! # Core Concepts
//!
//! - **Event**: a name plus opaque parameters handed to actions
//! - **Response**: a candidate transition with an optional action and guard
//! - **State / CompositeState**: leaves and nested sub-machines
//! - **Machine**: the top-level composite, driven reactively or actively
//! - **Context**: caller-owned data passed into every guard and action
//!
//! # Example
//!
//! ```rust
//! use hsmkit::builder::MachineBuilder;
//! use hsmkit::core::{Event, Response, State};
//!
//! #[derive(Default)]
//! struct Journal {
//!     lines: Vec<String>,
//! }
//!
//! let mut builder = MachineBuilder::<Journal>::new("job")
//!     .on_end(|j: &mut Journal| {
//!         j.lines.push("job finished".to_string());
//!         Ok(())
//!     });
//! let root = builder.root();
//! let queued = builder
//!     .add_state(root, State::new("Queued").on_exit(|j: &mut Journal| {
//!         j.lines.push("leaving queue".to_string());
//!         Ok(())
//!     }))
//!     .unwrap();
//! let done = builder.add_state(root, State::new("Done").end_state()).unwrap();
//! builder.add_response(queued, "complete", Response::to(done)).unwrap();
//!
//! let mut machine = builder.build().unwrap();
//! let mut journal = Journal::default();
//!
//! let summary = machine
//!     .run(vec![Event::new("complete"), Event::new("ignored")], &mut journal)
//!     .unwrap();
//!
//! assert!(summary.finished);
//! assert_eq!(machine.current(), done);
//! assert_eq!(journal.lines, vec!["leaving queue", "job finished"]);
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod snapshot;
pub mod validation;

// Re-export commonly used types
pub use crate::builder::{BuildError, MachineBuilder};
pub use crate::core::{CompositeState, Event, Guard, Response, State, StateId};
pub use crate::machine::{Machine, MachineError, Outcome, SharedMachine, UnhandledStrategy};
