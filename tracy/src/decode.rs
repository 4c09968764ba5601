//! Error-code decoding: integer code → human-readable description.
//!
//! The renderer only needs one capability from a decoder: write a
//! description of a code into a caller-owned bounded buffer, without
//! shared mutable state and without panicking. Two decoders ship with the
//! crate:
//!
//! - [`OsDecoder`] - platform errno strings via the re-entrant `strerror_r`
//! - [`CodeTable`] - a static table of domain-specific codes, optionally
//!   falling back to another decoder
//!
//! ```rust
//! use tracy::{CodeTable, ErrorCode, ErrorDecoder, ErrorString, OsDecoder};
//!
//! static OS: OsDecoder = OsDecoder;
//! static CODES: CodeTable = CodeTable::new(&[(1000, "queue closed")]).with_fallback(&OS);
//!
//! let mut buf = ErrorString::new();
//! CODES.decode(ErrorCode::new(1000), &mut buf).unwrap();
//! assert_eq!(buf.as_str(), "queue closed");
//! ```

use std::fmt;

use tracy_common::consts::MAX_ERR_STR_BUF_SIZE;

use crate::code::ErrorCode;
use crate::error::DecodeError;
use crate::message::format_bounded;

/// Bounded scratch buffer a description is decoded into.
pub type ErrorString = heapless::String<MAX_ERR_STR_BUF_SIZE>;

/// Decodes integer error codes into descriptions.
///
/// Implementations must be callable concurrently from any thread and must
/// report unrecognized codes as [`DecodeError::Unknown`] instead of panicking.
pub trait ErrorDecoder: Send + Sync {
    /// Write the description of `code` into `buf`, replacing its contents.
    fn decode(&self, code: ErrorCode, buf: &mut ErrorString) -> Result<(), DecodeError>;
}

/// Decode `code` into a fresh buffer.
pub fn describe(decoder: &dyn ErrorDecoder, code: ErrorCode) -> Result<ErrorString, DecodeError> {
    let mut buf = ErrorString::new();
    decoder.decode(code, &mut buf)?;
    Ok(buf)
}

/// Platform errno descriptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsDecoder;

/// Process-wide default decoder.
pub static OS_DECODER: OsDecoder = OsDecoder;

#[cfg(unix)]
impl ErrorDecoder for OsDecoder {
    fn decode(&self, code: ErrorCode, buf: &mut ErrorString) -> Result<(), DecodeError> {
        use nix::errno::Errno;
        use std::ffi::CStr;

        let mut scratch = [0u8; MAX_ERR_STR_BUF_SIZE + 1];
        // SAFETY: `scratch` is writable for MAX_ERR_STR_BUF_SIZE bytes and keeps
        // one extra zero byte, so the result is always NUL-terminated.
        let rc = unsafe {
            libc::strerror_r(
                code.raw(),
                scratch.as_mut_ptr().cast::<libc::c_char>(),
                MAX_ERR_STR_BUF_SIZE,
            )
        };
        if rc != 0 {
            // Old glibc reports through errno and returns -1.
            let errno = if rc == -1 { Errno::last_raw() } else { rc };
            return Err(if errno == libc::EINVAL {
                DecodeError::Unknown { code }
            } else {
                DecodeError::Lookup { code, errno }
            });
        }

        let text = match CStr::from_bytes_until_nul(&scratch) {
            Ok(cstr) => cstr.to_bytes(),
            Err(_) => &scratch[..MAX_ERR_STR_BUF_SIZE],
        };
        let text = match std::str::from_utf8(text) {
            Ok(s) => s,
            Err(e) => std::str::from_utf8(&text[..e.valid_up_to()]).unwrap_or_default(),
        };
        if text.is_empty() {
            return Err(DecodeError::Unknown { code });
        }
        format_bounded(buf, format_args!("{text}"));
        Ok(())
    }
}

#[cfg(not(unix))]
impl ErrorDecoder for OsDecoder {
    fn decode(&self, code: ErrorCode, buf: &mut ErrorString) -> Result<(), DecodeError> {
        let err = std::io::Error::from_raw_os_error(code.raw());
        format_bounded(buf, format_args!("{err}"));
        if buf.is_empty() {
            return Err(DecodeError::Unknown { code });
        }
        Ok(())
    }
}

/// Static table of domain-specific codes.
///
/// Codes missing from the table go to the fallback decoder when one is set,
/// otherwise they decode as [`DecodeError::Unknown`].
#[derive(Clone, Copy)]
pub struct CodeTable {
    entries: &'static [(i32, &'static str)],
    fallback: Option<&'static dyn ErrorDecoder>,
}

impl CodeTable {
    pub const fn new(entries: &'static [(i32, &'static str)]) -> Self {
        Self {
            entries,
            fallback: None,
        }
    }

    /// Consult `fallback` for codes not in the table.
    pub const fn with_fallback(self, fallback: &'static dyn ErrorDecoder) -> Self {
        Self {
            entries: self.entries,
            fallback: Some(fallback),
        }
    }

    /// Table entry for `code`, ignoring the fallback.
    pub fn lookup(&self, code: ErrorCode) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(raw, _)| *raw == code.raw())
            .map(|(_, text)| *text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ErrorDecoder for CodeTable {
    fn decode(&self, code: ErrorCode, buf: &mut ErrorString) -> Result<(), DecodeError> {
        match (self.lookup(code), self.fallback) {
            (Some(text), _) => {
                format_bounded(buf, format_args!("{text}"));
                Ok(())
            }
            (None, Some(fallback)) => fallback.decode(code, buf),
            (None, None) => Err(DecodeError::Unknown { code }),
        }
    }
}

impl fmt::Debug for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeTable")
            .field("entries", &self.entries)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TABLE: CodeTable = CodeTable::new(&[(5, "I/O error"), (1001, "queue closed")]);
    static CHAINED: CodeTable =
        CodeTable::new(&[(1001, "queue closed")]).with_fallback(&OS_DECODER);

    #[test]
    fn os_decoder_known_errno() {
        let text = describe(&OS_DECODER, ErrorCode::new(libc::ENOENT)).unwrap();
        assert!(!text.is_empty());
        assert_eq!(
            text.as_str(),
            std::io::Error::from_raw_os_error(libc::ENOENT)
                .to_string()
                .split(" (os error")
                .next()
                .unwrap()
        );
    }

    #[test]
    fn os_decoder_is_stable_across_calls() {
        let a = describe(&OS_DECODER, ErrorCode::new(libc::EIO)).unwrap();
        let b = describe(&OS_DECODER, ErrorCode::new(libc::EIO)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn os_decoder_never_panics_on_odd_codes() {
        for raw in [i32::MIN, -1, 0, 4096, i32::MAX] {
            let _ = describe(&OS_DECODER, ErrorCode::new(raw));
        }
    }

    #[test]
    fn table_hit() {
        let text = describe(&TABLE, ErrorCode::new(5)).unwrap();
        assert_eq!(text.as_str(), "I/O error");
        assert_eq!(TABLE.lookup(ErrorCode::new(1001)), Some("queue closed"));
        assert_eq!(TABLE.len(), 2);
    }

    #[test]
    fn table_miss_without_fallback_is_unknown() {
        let err = describe(&TABLE, ErrorCode::new(77)).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Unknown {
                code: ErrorCode::new(77)
            }
        );
    }

    #[test]
    fn table_miss_uses_fallback() {
        let chained = describe(&CHAINED, ErrorCode::new(libc::EACCES)).unwrap();
        let direct = describe(&OS_DECODER, ErrorCode::new(libc::EACCES)).unwrap();
        assert_eq!(chained, direct);
        assert_eq!(
            describe(&CHAINED, ErrorCode::new(1001)).unwrap().as_str(),
            "queue closed"
        );
    }

    #[test]
    fn decode_replaces_buffer_contents() {
        let mut buf = ErrorString::new();
        TABLE.decode(ErrorCode::new(1001), &mut buf).unwrap();
        TABLE.decode(ErrorCode::new(5), &mut buf).unwrap();
        assert_eq!(buf.as_str(), "I/O error");
    }
}
