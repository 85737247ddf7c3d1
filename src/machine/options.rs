//! Runtime options chosen at build time.

/// Strategy for events that no state in the active chain responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnhandledStrategy {
    /// Stop the active run with `MachineError::UnhandledEvent`
    #[default]
    Fail,

    /// Skip the event and log a warning
    IgnoreAndLog,
}

/// Options applied by a built machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineOptions {
    pub on_unhandled: UnhandledStrategy,
    pub record_history: bool,
    pub history_limit: Option<usize>,
}

impl Default for MachineOptions {
    fn default() -> Self {
        Self {
            on_unhandled: UnhandledStrategy::Fail,
            record_history: true,
            history_limit: None,
        }
    }
}
