//! Point-in-time views of a machine for diagnostics.
//!
//! A snapshot records where a machine is, not how it is wired: actions and
//! guards are not serializable, and a snapshot cannot be turned back into a
//! machine.

use crate::core::StateId;
use crate::machine::Machine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Serializable view of a machine's active configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    /// Unique id of the machine instance
    pub machine_id: Uuid,

    /// Machine (root composite) name
    pub machine: String,

    /// Active leaf
    pub current: StateId,

    /// Names of the active states, outermost first
    pub active_path: Vec<String>,

    /// Whether the machine has handled any event yet
    pub started: bool,

    /// Whether the top-level state is an end state
    pub finished: bool,

    /// Transitions currently held in history
    pub transitions: usize,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,
}

impl MachineSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }
}

impl<C> Machine<C> {
    /// Capture the active configuration.
    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            machine_id: self.id(),
            machine: self.name().to_string(),
            current: self.current(),
            active_path: self
                .active_path()
                .into_iter()
                .map(|id| self.label(id))
                .collect(),
            started: self.is_started(self.root()),
            finished: self.is_finished(),
            transitions: self.history().len(),
            taken_at: Utc::now(),
        }
    }
}
