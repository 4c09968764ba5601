//! # Tracy - Per-Thread Error Traceback Recorder
//!
//! Python-style tracebacks for code that propagates errors as return codes,
//! without stack unwinding and without heap allocation on the error path.
//!
//! Each instrumented call site on the way out of a failing call chain records
//! an "I was here" frame. A top-level handler then renders the frames, the
//! decoded error code and an optional message, and clears the state.
//!
//! ## Architecture Overview
//!
//! ```text
//!   failure site            enclosing callers            top-level handler
//! ┌───────────────┐       ┌───────────────────┐       ┌────────────────────┐
//! │ set_error_msg!├──────►│ check! / add_trace├──────►│ render_and_clear   │
//! │ start_error!  │       │   (push_frame)    │       │ (stderr)           │
//! └───────┬───────┘       └─────────┬─────────┘       └─────────┬──────────┘
//!         │                         │                           │
//!         ▼                         ▼                           ▼
//!   ┌──────────────────────── thread-local TraceState ─────────────────────┐
//!   │ TraceStack [TraceFrame; 1024] + depth │ checkpoint │ MessageSlot(512) │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use tracy::{check, fail, ErrorCode};
//!
//! fn read_block(n: u32) -> Result<u32, ErrorCode> {
//!     if n > 8 {
//!         fail!(libc::EIO, "block {} is past the end of the device", n);
//!     }
//!     Ok(n * 512)
//! }
//!
//! fn read_header() -> Result<u32, ErrorCode> {
//!     let offset = check!(read_block(9));
//!     Ok(offset)
//! }
//!
//! if let Err(code) = read_header() {
//!     let mut out = Vec::new();
//!     tracy::render_to(&mut out, code);
//!     tracy::clear();
//!     assert!(String::from_utf8(out).unwrap().starts_with("CC Traceback:\n"));
//! }
//! ```
//!
//! ## Checkpoints
//!
//! When an inner error is handled and discarded (retry, fallback), the frames
//! it recorded are rolled back with a checkpoint:
//!
//! ```rust
//! tracy::save_checkpoint();
//! tracy::push_frame("retry.rs", "attempt", 12);
//! // error handled, try again
//! tracy::restore_checkpoint();
//! assert_eq!(tracy::depth(), 0);
//! ```
//!
//! ## Thread Safety
//!
//! All state is thread-local: a thread's traceback is invisible to every
//! other thread. Only the output sink (stderr) is shared, so lines of
//! concurrent renders on different threads may interleave.
//!
//! ## Failure Model
//!
//! The recorder never reports errors to its callers. A push on a full stack
//! is dropped with a warning on stderr; over-long messages are truncated
//! silently; an undecodable code renders as `unknown`.

#![warn(clippy::all)]

pub mod code;
pub mod decode;
pub mod error;
pub mod frame;
mod macros;
pub mod message;
pub mod render;
pub mod stack;
pub mod state;

pub use code::ErrorCode;
pub use decode::{CodeTable, ErrorDecoder, ErrorString, OS_DECODER, OsDecoder, describe};
pub use error::{DecodeError, StackOverflow};
pub use frame::TraceFrame;
pub use message::MessageSlot;
pub use render::{TRACEBACK_HEADER, Traceback, render_traceback};
pub use stack::TraceStack;
pub use state::{
    TraceState, begin, checkpoint, clear, depth, dropped_frames, has_message, push_frame, render,
    render_and_clear, render_and_clear_if_error, render_to, reset_decoder, restore_checkpoint,
    save_checkpoint, set_decoder, set_message, with_frames, with_message,
};

pub use tracy_common::consts::{MAX_ERR_STR_BUF_SIZE, MAX_STACK_SIZE, MAX_USER_ERR_MSG_SIZE};

/// Initialize tracing so the recorder's warnings show up in logs
///
/// Filtering follows `RUST_LOG`. Does nothing if a global subscriber is
/// already installed.
///
/// ```rust
/// tracy::init_tracing();
/// tracy::init_tracing();
///
/// // Overflow reports now also reach the subscriber as `warn` events.
/// for line in 0..=tracy::MAX_STACK_SIZE as u32 {
///     tracy::push_frame("init.rs", "deep", line);
/// }
/// assert_eq!(tracy::dropped_frames(), 1);
/// tracy::clear();
/// ```
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
