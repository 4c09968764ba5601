//! Bounded message slot and the truncating formatter behind it.

use std::fmt;

use heapless::String;
use tracy_common::consts::MAX_USER_ERR_MSG_SIZE;

/// `fmt::Write` adapter that fills a fixed-capacity string and silently
/// drops whatever does not fit.
///
/// The cut always lands on a UTF-8 character boundary. Once the buffer is
/// full the adapter reports `fmt::Error` so formatting stops early; callers
/// ignore that error.
pub(crate) struct BoundedWriter<'a, const N: usize> {
    buf: &'a mut String<N>,
}

impl<'a, const N: usize> BoundedWriter<'a, N> {
    pub(crate) fn new(buf: &'a mut String<N>) -> Self {
        Self { buf }
    }
}

impl<const N: usize> fmt::Write for BoundedWriter<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = N - self.buf.len();
        if s.len() <= room {
            let _ = self.buf.push_str(s);
            return Ok(());
        }

        let mut cut = room;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        let _ = self.buf.push_str(&s[..cut]);
        Err(fmt::Error)
    }
}

/// Format `args` into `buf`, replacing its contents and truncating at `N` bytes.
pub(crate) fn format_bounded<const N: usize>(buf: &mut String<N>, args: fmt::Arguments<'_>) {
    buf.clear();
    let _ = fmt::write(&mut BoundedWriter::new(buf), args);
}

/// The most specific human-authored description of the current error.
///
/// Empty means "no message set".
#[derive(Debug, Clone, Default)]
pub struct MessageSlot {
    buf: String<MAX_USER_ERR_MSG_SIZE>,
}

impl MessageSlot {
    /// Create an empty slot.
    pub const fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Overwrite the message with `args`, keeping at most
    /// [`MAX_USER_ERR_MSG_SIZE`] bytes.
    pub fn set(&mut self, args: fmt::Arguments<'_>) {
        format_bounded(&mut self.buf, args);
    }

    /// Empty the slot.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Current message; empty when none is set.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.buf.as_str()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }
}
