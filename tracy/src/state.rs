//! Per-thread recorder state and the free-function API over it.
//!
//! Every thread owns one [`TraceState`], created zero-initialised on first
//! use and never shared. The free functions below are the only way to reach
//! it, so no locking is involved anywhere.
//!
//! All functions are infallible. Anomalies (stack overflow, a failed error
//! lookup) are written to stderr and emitted as `tracing` warnings. Calls
//! made while the state is already borrowed on this thread (for instance from
//! inside a custom decoder during a render) are ignored.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};

use tracing::{trace, warn};

use crate::code::ErrorCode;
use crate::decode::{ErrorDecoder, OS_DECODER};
use crate::error::StackOverflow;
use crate::frame::TraceFrame;
use crate::message::MessageSlot;
use crate::render::Traceback;
use crate::stack::TraceStack;

/// Line written to the diagnostic sink when a push finds the stack full.
pub const OVERFLOW_WARNING: &str = "Warning: error stack overflow (no room for stack trace)";

/// Trace stack, checkpoint register, message slot and decoder of one thread.
///
/// Usable on its own (tests, embedding); the crate-level functions operate
/// on a thread-local instance.
#[derive(Clone)]
pub struct TraceState {
    stack: TraceStack,
    message: MessageSlot,
    decoder: Option<&'static dyn ErrorDecoder>,
}

impl TraceState {
    pub const fn new() -> Self {
        Self {
            stack: TraceStack::new(),
            message: MessageSlot::new(),
            decoder: None,
        }
    }

    /// Drop all frames and the message.
    pub fn clear(&mut self) {
        if !self.stack.is_empty() {
            trace!(discarded = self.stack.depth(), "traceback cleared");
        }
        self.stack.clear();
        self.message.clear();
    }

    pub fn save_checkpoint(&mut self) {
        self.stack.save_checkpoint();
    }

    pub fn restore_checkpoint(&mut self) {
        let from = self.stack.depth();
        self.stack.restore_checkpoint();
        trace!(from, to = self.stack.depth(), "traceback checkpoint restored");
    }

    /// Append a frame; on overflow write [`OVERFLOW_WARNING`] to `diag`
    /// instead.
    pub fn push_frame_with<W: Write + ?Sized>(&mut self, frame: TraceFrame, diag: &mut W) {
        if let Err(overflow) = self.stack.push(frame) {
            self.report_overflow(frame, overflow, diag);
        }
    }

    /// Append a frame, warning on stderr if the stack is full.
    ///
    /// Stderr is only locked when the push is refused.
    pub fn push_frame(&mut self, frame: TraceFrame) {
        if let Err(overflow) = self.stack.push(frame) {
            self.report_overflow(frame, overflow, &mut io::stderr().lock());
        }
    }

    fn report_overflow<W: Write + ?Sized>(
        &self,
        frame: TraceFrame,
        overflow: StackOverflow,
        diag: &mut W,
    ) {
        warn!(
            capacity = overflow.capacity,
            dropped = self.stack.dropped(),
            file = frame.file,
            line = frame.line,
            function = frame.function,
            "{overflow}"
        );
        let _ = writeln!(diag, "{OVERFLOW_WARNING}");
    }

    pub fn set_message(&mut self, args: fmt::Arguments<'_>) {
        self.message.set(args);
    }

    /// Use `decoder` for rendering instead of the platform decoder.
    pub fn set_decoder(&mut self, decoder: &'static dyn ErrorDecoder) {
        self.decoder = Some(decoder);
    }

    pub fn reset_decoder(&mut self) {
        self.decoder = None;
    }

    pub fn decoder(&self) -> &'static dyn ErrorDecoder {
        match self.decoder {
            Some(decoder) => decoder,
            None => &OS_DECODER,
        }
    }

    /// Borrowed traceback view for `code`.
    pub fn traceback(&self, code: ErrorCode) -> Traceback<'_> {
        Traceback::new(self.stack.frames(), self.message.as_str(), code, self.decoder())
    }

    /// Render to `out`. Does not modify the state.
    pub fn render_to<W: Write + ?Sized>(&self, out: &mut W, code: ErrorCode) {
        self.traceback(code).write_to(out);
    }

    pub fn stack(&self) -> &TraceStack {
        &self.stack
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl Default for TraceState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TraceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceState")
            .field("depth", &self.stack.depth())
            .field("checkpoint", &self.stack.checkpoint())
            .field("dropped", &self.stack.dropped())
            .field("message", &self.message.as_str())
            .field("custom_decoder", &self.decoder.is_some())
            .finish()
    }
}

thread_local! {
    static STATE: RefCell<TraceState> = const { RefCell::new(TraceState::new()) };
}

fn with_state<R>(f: impl FnOnce(&mut TraceState) -> R) -> Option<R> {
    STATE
        .try_with(|cell| cell.try_borrow_mut().ok().map(|mut state| f(&mut state)))
        .ok()
        .flatten()
}

fn with_state_ref<R>(f: impl FnOnce(&TraceState) -> R) -> Option<R> {
    STATE
        .try_with(|cell| cell.try_borrow().ok().map(|state| f(&state)))
        .ok()
        .flatten()
}

// ─── Recording ──────────────────────────────────────────────────────

/// Reset depth to 0 and empty the message slot.
pub fn clear() {
    with_state(TraceState::clear);
}

/// Copy the current depth into the checkpoint register.
pub fn save_checkpoint() {
    with_state(TraceState::save_checkpoint);
}

/// Set depth back to the checkpoint register (0 if never saved).
pub fn restore_checkpoint() {
    with_state(TraceState::restore_checkpoint);
}

/// Start a traceback at the failure site. Same effect as [`push_frame`].
pub fn begin(file: &'static str, function: &'static str, line: u32) {
    push_frame(file, function, line);
}

/// Add a frame on the way out of a failing call chain.
///
/// When the stack is full the frame is dropped and a warning is written to
/// stderr.
pub fn push_frame(file: &'static str, function: &'static str, line: u32) {
    with_state(|state| state.push_frame(TraceFrame::new(file, function, line)));
}

/// Set the error message, truncated to
/// [`MAX_USER_ERR_MSG_SIZE`](tracy_common::consts::MAX_USER_ERR_MSG_SIZE) bytes.
///
/// Usually reached through [`set_error_msg!`](crate::set_error_msg).
pub fn set_message(args: fmt::Arguments<'_>) {
    with_state(|state| state.set_message(args));
}

/// Decode codes with `decoder` on this thread.
pub fn set_decoder(decoder: &'static dyn ErrorDecoder) {
    with_state(|state| state.set_decoder(decoder));
}

/// Go back to the platform decoder on this thread.
pub fn reset_decoder() {
    with_state(TraceState::reset_decoder);
}

// ─── Rendering ──────────────────────────────────────────────────────

/// Write the traceback for `code` to stderr.
pub fn render(code: impl Into<ErrorCode>) {
    let code = code.into();
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    render_to(&mut handle, code);
}

/// Write the traceback for `code` to `out`.
pub fn render_to<W: Write + ?Sized>(out: &mut W, code: impl Into<ErrorCode>) {
    let code = code.into();
    with_state_ref(|state| state.render_to(out, code));
}

/// [`render`] followed by [`clear`].
pub fn render_and_clear(code: impl Into<ErrorCode>) {
    render(code);
    clear();
}

/// [`render_and_clear`] unless `code` is [`ErrorCode::OK`].
pub fn render_and_clear_if_error(code: impl Into<ErrorCode>) {
    let code = code.into();
    if code.is_err() {
        render_and_clear(code);
    }
}

// ─── Inspection ─────────────────────────────────────────────────────

/// Number of frames recorded on this thread.
pub fn depth() -> usize {
    with_state_ref(|state| state.stack.depth()).unwrap_or(0)
}

/// Value of this thread's checkpoint register.
pub fn checkpoint() -> usize {
    with_state_ref(|state| state.stack.checkpoint()).unwrap_or(0)
}

/// Frames refused for lack of room since the last [`clear`].
pub fn dropped_frames() -> u32 {
    with_state_ref(|state| state.stack.dropped()).unwrap_or(0)
}

pub fn has_message() -> bool {
    with_state_ref(|state| !state.message.is_empty()).unwrap_or(false)
}

/// Run `f` on the current message (empty when none is set).
pub fn with_message<R>(f: impl FnOnce(&str) -> R) -> Option<R> {
    with_state_ref(|state| f(state.message()))
}

/// Run `f` on the recorded frames, outermost first.
pub fn with_frames<R>(f: impl FnOnce(&[TraceFrame]) -> R) -> Option<R> {
    with_state_ref(|state| f(state.stack.frames()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::CodeTable;
    use tracy_common::consts::MAX_STACK_SIZE;

    static CODES: CodeTable = CodeTable::new(&[(5, "I/O error")]);

    #[test]
    fn state_push_and_render() {
        let mut state = TraceState::new();
        state.set_decoder(&CODES);
        state.push_frame(TraceFrame::new("a.c", "outer", 10));
        state.push_frame(TraceFrame::new("a.c", "inner", 20));
        state.set_message(format_args!("disk full"));

        let mut out = Vec::new();
        state.render_to(&mut out, ErrorCode::new(5));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("line 20, in inner\n  File \"a.c\", line 10"));
        assert!(text.ends_with("Error message: disk full\n"));
        assert_eq!(state.stack().depth(), 2);
    }

    #[test]
    fn state_overflow_writes_warning_to_diag() {
        let mut state = TraceState::new();
        let mut diag = Vec::new();
        for line in 0..=MAX_STACK_SIZE as u32 {
            state.push_frame_with(TraceFrame::new("x.rs", "f", line), &mut diag);
        }
        assert_eq!(state.stack().depth(), MAX_STACK_SIZE);
        assert_eq!(state.stack().dropped(), 1);
        assert_eq!(
            String::from_utf8(diag).unwrap(),
            format!("{OVERFLOW_WARNING}\n")
        );
    }

    #[test]
    fn state_clear_keeps_decoder() {
        let mut state = TraceState::new();
        state.set_decoder(&CODES);
        state.set_message(format_args!("m"));
        state.clear();
        assert!(state.message().is_empty());
        assert_eq!(
            state.traceback(ErrorCode::new(5)).to_string(),
            "CC Traceback:\nError: I/O error (5)\n"
        );
    }

    #[test]
    fn thread_local_render_does_not_mutate() {
        clear();
        push_frame("t.rs", "f", 1);
        let mut first = Vec::new();
        let mut second = Vec::new();
        render_to(&mut first, 5);
        render_to(&mut second, 5);
        assert_eq!(first, second);
        assert_eq!(depth(), 1);
        clear();
    }

    #[test]
    fn reentrant_call_from_decoder_is_ignored() {
        struct Reentrant;
        impl ErrorDecoder for Reentrant {
            fn decode(
                &self,
                code: ErrorCode,
                _buf: &mut crate::decode::ErrorString,
            ) -> Result<(), crate::error::DecodeError> {
                // State is borrowed by the render in progress.
                push_frame("inside.rs", "decode", 1);
                clear();
                Err(crate::error::DecodeError::Unknown { code })
            }
        }
        static REENTRANT: Reentrant = Reentrant;

        clear();
        set_decoder(&REENTRANT);
        push_frame("t.rs", "f", 1);
        let mut out = Vec::new();
        render_to(&mut out, 1);
        assert_eq!(depth(), 1);
        reset_decoder();
        clear();
    }
}
