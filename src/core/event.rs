//! Events offered to a machine for dispatch.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A named trigger with optional parameters.
///
/// Identity is the name alone. Parameters are transport only: they are handed
/// to transition actions but never take part in equality or lookup.
///
/// # Example
///
/// ```rust
/// use hsmkit::core::Event;
/// use serde_json::json;
///
/// let plain = Event::new("deposit");
/// let with_amount = Event::new("deposit").with_param(json!(250));
///
/// assert_eq!(plain, with_amount);
/// assert_eq!(with_amount.param(0), Some(&json!(250)));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    name: String,
    #[serde(default)]
    params: Vec<Value>,
}

impl Event {
    /// Create an event without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Create an event carrying the given parameters, in order.
    pub fn with_params(name: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Append one parameter.
    pub fn with_param(mut self, value: Value) -> Self {
        self.params.push(value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn param(&self, index: usize) -> Option<&Value> {
        self.params.get(index)
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Event {}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Event {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Event {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
