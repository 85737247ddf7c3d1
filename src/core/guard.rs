//! Guard predicates for controlling transitions.
//!
//! Guards are boolean functions over the caller's context that decide whether
//! a candidate response may fire. They must not have side effects.

use std::fmt;

/// Predicate that determines if a candidate response is eligible.
///
/// `true` means the response may fire. Guards are evaluated in registration
/// order and the first eligible response wins.
///
/// # Example
///
/// ```rust
/// use hsmkit::core::Guard;
///
/// struct Account {
///     balance: i64,
/// }
///
/// let solvent = Guard::new(|acct: &Account| acct.balance >= 0);
///
/// assert!(solvent.check(&Account { balance: 10 }));
/// assert!(!solvent.check(&Account { balance: -5 }));
/// ```
pub struct Guard<C> {
    predicate: Box<dyn Fn(&C) -> bool + Send + Sync>,
}

impl<C> Guard<C> {
    /// Create a guard from a predicate over the context.
    ///
    /// The predicate should be deterministic for a given context and
    /// thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Check whether the guard allows the transition for this context.
    pub fn check(&self, ctx: &C) -> bool {
        (self.predicate)(ctx)
    }
}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
