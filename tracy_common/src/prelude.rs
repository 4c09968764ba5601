//! Prelude module for common re-exports.
//!
//! ```rust
//! use tracy_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};

// ─── Recorder Limits ────────────────────────────────────────────────
pub use crate::consts::{MAX_ERR_STR_BUF_SIZE, MAX_STACK_SIZE, MAX_USER_ERR_MSG_SIZE};
