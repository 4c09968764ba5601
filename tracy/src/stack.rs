//! Fixed-capacity trace stack with a single checkpoint register.
//!
//! ## Layout
//!
//! ```text
//!  index:   0          1                 depth-1      depth ... MAX_STACK_SIZE-1
//!         ┌──────────┬──────────┬─────┬───────────┬──────────────────────────┐
//!         │ outermost│          │ ... │ innermost │  unused / stale slots    │
//!         └──────────┴──────────┴─────┴───────────┴──────────────────────────┘
//!  push order ───────────────────────────────►
//!  render order ◄─────────────────────────────
//! ```
//!
//! Storage is a plain array indexed by `depth`; nothing is allocated after
//! construction and truncation only moves the index.

use tracy_common::consts::MAX_STACK_SIZE;

use crate::error::StackOverflow;
use crate::frame::TraceFrame;

/// Append-only, depth-bounded sequence of trace frames.
///
/// Invariant: `0 <= depth <= MAX_STACK_SIZE`.
#[derive(Debug, Clone)]
pub struct TraceStack {
    frames: [TraceFrame; MAX_STACK_SIZE],
    depth: usize,
    checkpoint: usize,
    dropped: u32,
}

impl TraceStack {
    /// Create an empty stack. Checkpoint register starts at 0.
    pub const fn new() -> Self {
        Self {
            frames: [TraceFrame::EMPTY; MAX_STACK_SIZE],
            depth: 0,
            checkpoint: 0,
            dropped: 0,
        }
    }

    /// Append a frame at the current depth.
    ///
    /// # Errors
    ///
    /// Returns [`StackOverflow`] and leaves the stored frames untouched when
    /// the stack is already full. The refusal is counted in [`Self::dropped`].
    #[inline]
    pub fn push(&mut self, frame: TraceFrame) -> Result<(), StackOverflow> {
        if self.depth >= MAX_STACK_SIZE {
            self.dropped = self.dropped.saturating_add(1);
            return Err(StackOverflow {
                capacity: MAX_STACK_SIZE,
            });
        }
        self.frames[self.depth] = frame;
        self.depth += 1;
        Ok(())
    }

    /// Discard all frames. The checkpoint register is left as is.
    #[inline]
    pub fn clear(&mut self) {
        self.depth = 0;
        self.dropped = 0;
    }

    /// Copy the current depth into the checkpoint register.
    #[inline]
    pub fn save_checkpoint(&mut self) {
        self.checkpoint = self.depth;
    }

    /// Set depth back to the checkpoint register.
    ///
    /// Unconditional: without a prior save this truncates to empty, and a
    /// checkpoint above the current depth re-exposes the frames still held
    /// in those slots.
    #[inline]
    pub fn restore_checkpoint(&mut self) {
        self.depth = self.checkpoint;
    }

    /// Number of recorded frames.
    #[inline]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Value held by the checkpoint register.
    #[inline]
    pub const fn checkpoint(&self) -> usize {
        self.checkpoint
    }

    /// Pushes refused for lack of room since the last [`Self::clear`].
    #[inline]
    pub const fn dropped(&self) -> u32 {
        self.dropped
    }

    /// True when no frames are recorded.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.depth == 0
    }

    /// True when a further push would be refused.
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.depth >= MAX_STACK_SIZE
    }

    /// Maximum number of frames.
    #[inline]
    pub const fn capacity(&self) -> usize {
        MAX_STACK_SIZE
    }

    /// Recorded frames, outermost first (push order).
    #[inline]
    pub fn frames(&self) -> &[TraceFrame] {
        &self.frames[..self.depth]
    }

    /// Recorded frames, innermost first (render order).
    #[inline]
    pub fn innermost_first(&self) -> impl DoubleEndedIterator<Item = &TraceFrame> + '_ {
        self.frames().iter().rev()
    }
}

impl Default for TraceStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(line: u32) -> TraceFrame {
        TraceFrame::new("stack.rs", "f", line)
    }

    #[test]
    fn test_new_stack_is_empty() {
        let stack = TraceStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.checkpoint(), 0);
        assert_eq!(stack.capacity(), MAX_STACK_SIZE);
        assert!(stack.frames().is_empty());
    }

    #[test]
    fn test_push_appends_in_order() {
        let mut stack = TraceStack::new();
        for line in 1..=3 {
            stack.push(frame(line)).unwrap();
        }
        let lines: Vec<u32> = stack.frames().iter().map(|f| f.line).collect();
        assert_eq!(lines, [1, 2, 3]);
        let reversed: Vec<u32> = stack.innermost_first().map(|f| f.line).collect();
        assert_eq!(reversed, [3, 2, 1]);
    }

    #[test]
    fn test_push_beyond_capacity_is_refused() {
        let mut stack = TraceStack::new();
        for line in 0..MAX_STACK_SIZE as u32 {
            stack.push(frame(line)).unwrap();
        }
        assert!(stack.is_full());

        let err = stack.push(frame(9999)).unwrap_err();
        assert_eq!(err.capacity, MAX_STACK_SIZE);
        assert_eq!(stack.depth(), MAX_STACK_SIZE);
        assert_eq!(stack.dropped(), 1);
        assert_eq!(stack.frames()[MAX_STACK_SIZE - 1].line, MAX_STACK_SIZE as u32 - 1);
    }

    #[test]
    fn test_clear_resets_depth_and_dropped_but_not_checkpoint() {
        let mut stack = TraceStack::new();
        stack.push(frame(1)).unwrap();
        stack.save_checkpoint();
        stack.push(frame(2)).unwrap();
        stack.clear();
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.dropped(), 0);
        assert_eq!(stack.checkpoint(), 1);
    }

    #[test]
    fn test_restore_without_save_truncates_to_empty() {
        let mut stack = TraceStack::new();
        stack.push(frame(1)).unwrap();
        stack.push(frame(2)).unwrap();
        stack.restore_checkpoint();
        assert!(stack.is_empty());
    }

    #[test]
    fn test_restore_above_depth_reexposes_slots() {
        let mut stack = TraceStack::new();
        stack.push(frame(1)).unwrap();
        stack.push(frame(2)).unwrap();
        stack.save_checkpoint();
        stack.clear();
        stack.restore_checkpoint();
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.frames()[1].line, 2);
    }
}
