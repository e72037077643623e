//! Inspection options

use crate::defaults::{DEFAULT_DECLARED_PARENT_FALLBACK, DEFAULT_MAX_DECLARED_PARENT_DEPTH};
use serde::{Deserialize, Serialize};

/// Options controlling the instance resolver
///
/// Deserializable so embedders can keep them in their own config files;
/// missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectOptions {
    /// Maximum declared-parent links followed before giving up
    pub max_declared_parent_depth: usize,
    /// Accept instances through declared-parent markers
    pub declared_parent_fallback: bool,
}

impl InspectOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the declared-parent depth cap
    pub fn with_max_declared_parent_depth(mut self, depth: usize) -> Self {
        self.max_declared_parent_depth = depth;
        self
    }

    /// Enable or disable the declared-parent fallback
    pub fn with_declared_parent_fallback(mut self, enabled: bool) -> Self {
        self.declared_parent_fallback = enabled;
        self
    }
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            max_declared_parent_depth: DEFAULT_MAX_DECLARED_PARENT_DEPTH,
            declared_parent_fallback: DEFAULT_DECLARED_PARENT_FALLBACK,
        }
    }
}
