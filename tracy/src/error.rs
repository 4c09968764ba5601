//! Error types for the traceback recorder.
//!
//! None of these ever reach callers of the per-thread API: the recorder is
//! infallible from the outside. They are used internally and by the
//! lower-level building blocks ([`crate::TraceStack`], [`crate::ErrorDecoder`]).

use thiserror::Error;

use crate::code::ErrorCode;

/// Errors that can occur while decoding an error code into text
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The decoder does not recognize the code
    #[error("Unknown error code: {code}")]
    Unknown {
        /// Code that could not be decoded
        code: ErrorCode,
    },

    /// The lookup facility itself failed
    #[error("strerror_r returned errno {errno}")]
    Lookup {
        /// Code that was being decoded
        code: ErrorCode,
        /// Errno reported by the lookup facility
        errno: i32,
    },
}

/// A push was refused because the trace stack is full
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("error stack overflow (no room for stack trace)")]
pub struct StackOverflow {
    /// Capacity of the stack that refused the frame
    pub capacity: usize,
}
