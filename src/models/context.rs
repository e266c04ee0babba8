//! Caller identity passed into mutating operations.

use serde::{Deserialize, Serialize};

/// Identifies who is performing an operation.
///
/// Passed explicitly to every operation that stamps an actor on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    /// The user name recorded on created records.
    pub user: String,
}

impl ActorContext {
    /// Creates a context for the given user.
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }

    /// Context for automated jobs with no human actor.
    pub fn system() -> Self {
        Self::new("system")
    }
}
