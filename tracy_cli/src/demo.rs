//! `tracy demo`: an instrumented call chain that fails on purpose.
//!
//! The chain recurses `depth` levels. The innermost level sets the message
//! and starts the traceback, every level on the way out adds its frame, and
//! the top renders and clears. With `recover`, a failed lookup is attempted
//! first and its frames are rolled back with a checkpoint before the real
//! failure happens.

use std::io::Write;

use tracing::{debug, info};
use tracy::{ErrorCode, MAX_STACK_SIZE, check, fail};

use crate::error::{CliError, CliResult};

/// Deepest accepted chain: one level more than the trace stack holds, so the
/// overflow warning can be shown.
pub const MAX_DEMO_DEPTH: usize = MAX_STACK_SIZE + 1;

/// Parameters of one demo run.
#[derive(Debug, Clone)]
pub struct DemoOptions {
    /// Number of frames the failing chain records.
    pub depth: usize,
    /// Code the innermost level fails with.
    pub code: ErrorCode,
    /// Message set at the failure site.
    pub message: Option<String>,
    /// Attempt and discard a failing lookup before the real failure.
    pub recover: bool,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            depth: 3,
            code: ErrorCode::new(libc::EIO),
            message: None,
            recover: false,
        }
    }
}

fn descend(level: usize, opts: &DemoOptions) -> Result<(), ErrorCode> {
    if level + 1 >= opts.depth {
        match &opts.message {
            Some(message) => fail!(opts.code, "{message}"),
            None => fail!(opts.code),
        }
    }
    check!(descend(level + 1, opts));
    Ok(())
}

fn cached_lookup() -> Result<u32, ErrorCode> {
    fail!(libc::EAGAIN)
}

fn lookup_with_retry() -> Result<u32, ErrorCode> {
    tracy::save_checkpoint();
    match cached_lookup() {
        Ok(value) => Ok(value),
        Err(code) => {
            debug!(code = code.raw(), discarded = tracy::depth(), "lookup failed, retrying");
            tracy::restore_checkpoint();
            Ok(0)
        }
    }
}

/// Run the demo chain and render its traceback to `out`.
///
/// Returns the code the chain failed with.
pub fn run_demo<W: Write>(out: &mut W, opts: &DemoOptions) -> CliResult<ErrorCode> {
    if opts.depth == 0 {
        return Err(CliError::InvalidArgument("depth must be at least 1".into()));
    }
    if opts.depth > MAX_DEMO_DEPTH {
        return Err(CliError::InvalidArgument(format!(
            "depth {} exceeds the maximum of {MAX_DEMO_DEPTH}",
            opts.depth
        )));
    }
    if opts.code.is_ok() {
        return Err(CliError::InvalidArgument(format!(
            "code {} is the success sentinel",
            opts.code
        )));
    }

    tracy::clear();
    if opts.recover {
        let _ = lookup_with_retry();
    }

    let code = descend(0, opts).err().unwrap_or(ErrorCode::OK);
    info!(
        code = code.raw(),
        depth = tracy::depth(),
        dropped = tracy::dropped_frames(),
        "demo chain failed"
    );

    tracy::render_to(&mut *out, code);
    tracy::clear();
    out.flush()?;
    Ok(code)
}
