//! A single trace point.

use std::fmt;

/// One "I was here" breadcrumb: source location plus enclosing function.
///
/// Frames only borrow their strings. They are expected to be program-lifetime
/// literals such as the output of `file!()`; the recorder never copies or
/// frees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceFrame {
    /// Source file of the call site.
    pub file: &'static str,
    /// Function enclosing the call site.
    pub function: &'static str,
    /// Line of the call site.
    pub line: u32,
}

impl TraceFrame {
    /// Placeholder occupying slots that were never pushed.
    pub const EMPTY: TraceFrame = TraceFrame::new("", "", 0);

    /// Create a frame. Values are stored verbatim.
    #[inline]
    pub const fn new(file: &'static str, function: &'static str, line: u32) -> Self {
        Self {
            file,
            function,
            line,
        }
    }
}

impl Default for TraceFrame {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Renders the body of a traceback line: `File "<file>", line <line>, in <function>`.
impl fmt::Display for TraceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File \"{}\", line {}, in {}",
            self.file, self.line, self.function
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_traceback_line() {
        let frame = TraceFrame::new("a.c", "inner", 20);
        assert_eq!(frame.to_string(), "File \"a.c\", line 20, in inner");
    }

    #[test]
    fn empty_frame_is_default() {
        assert_eq!(TraceFrame::default(), TraceFrame::EMPTY);
        assert_eq!(TraceFrame::EMPTY.line, 0);
    }
}
