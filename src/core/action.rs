//! Callable types supplied by the embedding application.

use crate::core::Event;

/// Error raised by an application callable.
///
/// The engine never inspects or wraps the payload beyond carrying it back to
/// the caller, so it can be downcast to the application's own error type.
pub type ActionError = Box<dyn std::error::Error + Send + Sync>;

/// Result returned by entry, exit, initial, end and transition actions.
pub type ActionResult = Result<(), ActionError>;

/// Action run on entering or leaving a state, or on composite start/end.
pub type StateAction<C> = Box<dyn Fn(&mut C) -> ActionResult + Send + Sync>;

/// Action run while a response fires. Receives the triggering event.
pub type TransitionAction<C> = Box<dyn Fn(&mut C, &Event) -> ActionResult + Send + Sync>;
