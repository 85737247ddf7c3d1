//! Validation-based topology checks.
//!
//! Uses Stillwater's `Validation` to accumulate every problem in a machine's
//! topology instead of stopping at the first one, so an assembly mistake can
//! be fixed in a single pass.
//!
//! # Example
//!
//! ```rust
//! use hsmkit::builder::MachineBuilder;
//! use hsmkit::core::{Response, State};
//!
//! let mut builder = MachineBuilder::<()>::new("door");
//! let open = builder.add_state(builder.root(), State::new("Open")).unwrap();
//! let shut = builder.add_state(builder.root(), State::new("Shut")).unwrap();
//! builder.add_response(open, "close", Response::to(shut)).unwrap();
//!
//! let machine = builder.build().unwrap();
//! assert!(machine.validate().is_success());
//! ```

mod errors;

pub use errors::TopologyError;

use crate::machine::node::{label, target_in_scope, Node};
use crate::core::StateId;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Check a state arena, accumulating ALL problems.
pub(crate) fn check_topology<C>(nodes: &[Node<C>]) -> Validation<(), NonEmptyVec<TopologyError>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<TopologyError>>> = Vec::new();

    // Every composite needs a child to delegate to
    for node in nodes {
        if let Some(composite) = node.as_composite() {
            let check = if composite.children.is_empty() || composite.current.is_none() {
                Validation::fail(TopologyError::EmptyComposite {
                    composite: node.name.clone(),
                })
            } else {
                Validation::success(())
            };
            checks.push(check);
        }
    }

    // The builder rejects duplicates on registration; this covers arenas
    // assembled outside it.
    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.name.as_str()) {
            checks.push(Validation::fail(TopologyError::DuplicateName {
                name: node.name.clone(),
            }));
        }
    }

    // Response targets must be siblings of their owner
    for (index, node) in nodes.iter().enumerate() {
        let owner = StateId::new(index);
        for (event, responses) in &node.responses {
            for response in responses {
                let check = if target_in_scope(nodes, owner, response.target()) {
                    Validation::success(())
                } else {
                    Validation::fail(TopologyError::ForeignTarget {
                        owner: node.name.clone(),
                        event: event.clone(),
                        target: label(nodes, response.target()),
                    })
                };
                checks.push(check);
            }
        }
    }

    Validation::all_vec(checks).map(|_| ())
}
