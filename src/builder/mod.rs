//! Builder API for assembling machines.
//!
//! States are registered bottom-up under their parent composite, responses
//! are attached to registered states, and `build()` validates the whole
//! topology before handing out a runnable [`Machine`](crate::machine::Machine).

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::MachineBuilder;
