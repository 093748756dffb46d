//! Cast configuration.
use serde::{Deserialize, Serialize};

/// What a failed candidate attempt does to the rest of the cast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Every failure moves on to the next candidate.
    #[default]
    SwallowAll,
    /// Hook errors abort the cast instead of being skipped.
    SurfaceHookErrors,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CastOptions {
    pub failure_policy: FailurePolicy,
}

impl CastOptions {
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}
