//! System-wide constants for the tracy workspace.
//!
//! Single source of truth for the recorder's capacity limits and default
//! paths. All limits are compile-time: the recorder never grows at runtime.

use static_assertions::const_assert;

/// Maximum number of trace frames recorded per thread.
pub const MAX_STACK_SIZE: usize = 1024;

/// Maximum length of the user error message, in bytes (excluding terminator).
pub const MAX_USER_ERR_MSG_SIZE: usize = 512;

/// Capacity of the scratch buffer an error code is decoded into.
pub const MAX_ERR_STR_BUF_SIZE: usize = 1024;

/// Default configuration file path for the `tracy` binary.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/tracy/tracy.toml";

const_assert!(MAX_STACK_SIZE > 0);
const_assert!(MAX_USER_ERR_MSG_SIZE > 0);
const_assert!(MAX_USER_ERR_MSG_SIZE <= MAX_ERR_STR_BUF_SIZE);
// Depth must fit the u32 counters used in diagnostics.
const_assert!(MAX_STACK_SIZE <= u32::MAX as usize);
