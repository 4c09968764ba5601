//! Integer error codes as passed along manual return-code error paths.

use nix::errno::Errno;
use static_assertions::const_assert_eq;
use std::fmt;

/// Integer error code returned by instrumented functions.
///
/// Codes that alias system errno values decode through the platform's
/// error strings; domain-specific codes decode through a caller-supplied
/// [`CodeTable`](crate::CodeTable). [`ErrorCode::OK`] is the only value that
/// means "no error".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct ErrorCode(pub i32);

const_assert_eq!(core::mem::size_of::<ErrorCode>(), core::mem::size_of::<i32>());

impl ErrorCode {
    /// The success sentinel.
    pub const OK: ErrorCode = ErrorCode(0);

    /// Wrap a raw integer code.
    #[inline]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw integer value.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// True for the success sentinel.
    #[inline]
    pub const fn is_ok(self) -> bool {
        self.0 == Self::OK.0
    }

    /// True for every value other than the success sentinel.
    #[inline]
    pub const fn is_err(self) -> bool {
        !self.is_ok()
    }

    /// The errno of the calling thread's last failed system call.
    pub fn last_os_error() -> Self {
        Errno::last().into()
    }
}

impl From<i32> for ErrorCode {
    #[inline]
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl From<ErrorCode> for i32 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.0
    }
}

impl From<Errno> for ErrorCode {
    #[inline]
    fn from(errno: Errno) -> Self {
        Self(errno as i32)
    }
}

impl From<&std::io::Error> for ErrorCode {
    /// Errors without an OS code map to `EIO`.
    fn from(err: &std::io::Error) -> Self {
        Self(err.raw_os_error().unwrap_or(libc::EIO))
    }
}

impl From<std::io::Error> for ErrorCode {
    fn from(err: std::io::Error) -> Self {
        Self::from(&err)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
