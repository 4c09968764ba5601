//! `tracy decode`: print error code descriptions.

use std::io::Write;

use tracy::render::{UNAVAILABLE_ERROR, UNKNOWN_ERROR};
use tracy::{DecodeError, ErrorCode, OS_DECODER, describe};

use crate::error::CliResult;

/// Write one `<code>: <description>` line per code.
pub fn run_decode<W: Write>(out: &mut W, codes: &[i32]) -> CliResult<()> {
    for &raw in codes {
        let code = ErrorCode::new(raw);
        match describe(&OS_DECODER, code) {
            Ok(text) => writeln!(out, "{code}: {text}")?,
            Err(DecodeError::Unknown { .. }) => writeln!(out, "{code}: {UNKNOWN_ERROR}")?,
            Err(DecodeError::Lookup { errno, .. }) => {
                writeln!(out, "{code}: {UNAVAILABLE_ERROR} (lookup errno {errno})")?
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_line_per_code() {
        let mut out = Vec::new();
        run_decode(&mut out, &[1, 2, 5]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("1: "));
        assert!(lines[2].starts_with("5: "));
        assert!(lines.iter().all(|l| l.len() > 3));
    }

    #[test]
    fn matches_library_decoder() {
        let mut out = Vec::new();
        run_decode(&mut out, &[13]).unwrap();
        let expected = describe(&OS_DECODER, ErrorCode::new(13)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("13: {expected}\n"));
    }
}
