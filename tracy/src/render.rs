//! Traceback rendering.
//!
//! Output format, kept stable for tooling that parses it:
//!
//! ```text
//! CC Traceback:
//!   File "<file>", line <line>, in <function>     (innermost first)
//! Error: <decoded string> (<numeric code>)
//! Error message: <message>                        (only if a message is set)
//! ```

use std::fmt;
use std::io;

use tracing::warn;

use crate::code::ErrorCode;
use crate::decode::{ErrorDecoder, ErrorString};
use crate::error::DecodeError;
use crate::frame::TraceFrame;

/// First line of every rendered traceback.
pub const TRACEBACK_HEADER: &str = "CC Traceback:";

/// Description printed when the decoder does not know the code.
pub const UNKNOWN_ERROR: &str = "unknown";

/// Description printed when the decoder's lookup itself failed.
pub const UNAVAILABLE_ERROR: &str = "unavailable";

/// Borrowed view of everything a rendered traceback needs.
///
/// `Display` produces the full multi-line traceback, trailing newline
/// included. Frames are given outermost first and printed innermost first.
#[derive(Clone, Copy)]
pub struct Traceback<'a> {
    frames: &'a [TraceFrame],
    message: &'a str,
    code: ErrorCode,
    decoder: &'a dyn ErrorDecoder,
}

impl<'a> Traceback<'a> {
    pub fn new(
        frames: &'a [TraceFrame],
        message: &'a str,
        code: ErrorCode,
        decoder: &'a dyn ErrorDecoder,
    ) -> Self {
        Self {
            frames,
            message,
            code,
            decoder,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn frames(&self) -> &'a [TraceFrame] {
        self.frames
    }

    pub fn message(&self) -> &'a str {
        self.message
    }

    /// Write the traceback to `out`.
    ///
    /// Sink errors are swallowed: rendering never fails from the caller's
    /// point of view.
    pub fn write_to<W: io::Write + ?Sized>(&self, out: &mut W) {
        let _ = write!(out, "{}", self);
        let _ = out.flush();
    }
}

impl fmt::Display for Traceback<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TRACEBACK_HEADER}")?;
        for frame in self.frames.iter().rev() {
            writeln!(f, "  {frame}")?;
        }

        let mut desc = ErrorString::new();
        let text = match self.decoder.decode(self.code, &mut desc) {
            Ok(()) => desc.as_str(),
            Err(DecodeError::Unknown { .. }) => UNKNOWN_ERROR,
            Err(DecodeError::Lookup { code, errno }) => {
                warn!(code = code.raw(), errno, "error code lookup failed");
                writeln!(f, "Error: strerror_r returned errno {errno}")?;
                UNAVAILABLE_ERROR
            }
        };
        writeln!(f, "Error: {text} ({})", self.code)?;

        if !self.message.is_empty() {
            writeln!(f, "Error message: {}", self.message)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Traceback<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traceback")
            .field("frames", &self.frames)
            .field("message", &self.message)
            .field("code", &self.code)
            .finish_non_exhaustive()
    }
}

/// Render `frames`, `message` and `code` to `out` in the traceback format.
pub fn render_traceback<W: io::Write + ?Sized>(
    out: &mut W,
    frames: &[TraceFrame],
    message: &str,
    code: ErrorCode,
    decoder: &dyn ErrorDecoder,
) {
    Traceback::new(frames, message, code, decoder).write_to(out);
}
