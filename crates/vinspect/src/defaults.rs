//! Default constants for inspection options.

/// Default maximum number of declared-parent links followed by the fallback walk.
pub const DEFAULT_MAX_DECLARED_PARENT_DEPTH: usize = 64;

/// Whether the declared-parent fallback is enabled by default.
pub const DEFAULT_DECLARED_PARENT_FALLBACK: bool = true;
