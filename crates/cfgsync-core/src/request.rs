//! Captured request that the engine can replay.

use serde_json::Value;

/// Which operation to call, with which arguments.
///
/// Captured once per logical operation, before the first attempt, and never
/// mutated afterwards. Paging parameters are layered on a copy of the
/// arguments at call time.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayableRequest {
    operation: String,
    arguments: Vec<Value>,
}

impl ReplayableRequest {
    pub fn new(operation: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            operation: operation.into(),
            arguments,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }
}
