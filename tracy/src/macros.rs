//! Call-site macros.
//!
//! These capture `file!()`, `line!()` and the enclosing function's path so
//! instrumented code never spells out a location by hand.
//!
//! ```rust
//! use tracy::{check, fail, ErrorCode};
//!
//! fn open_db(path: &str) -> Result<(), ErrorCode> {
//!     if path.is_empty() {
//!         fail!(libc::ENOENT, "no database path configured");
//!     }
//!     Ok(())
//! }
//!
//! fn startup() -> Result<(), ErrorCode> {
//!     check!(open_db(""));
//!     Ok(())
//! }
//!
//! let err = startup().unwrap_err();
//! assert_eq!(tracy::depth(), 2);
//! tracy::render_and_clear_if_error(err);
//! ```

/// Path of the enclosing function as a `&'static str`.
///
/// Closure suffixes are stripped, so a frame recorded inside a closure
/// names the function that owns it.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __tracy_here() {}
        fn __tracy_type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        let mut name = __tracy_type_name_of(__tracy_here);
        name = name.strip_suffix("::__tracy_here").unwrap_or(name);
        while let Some(outer) = name.strip_suffix("::{{closure}}") {
            name = outer;
        }
        name
    }};
}

/// Start a traceback at the current location.
#[macro_export]
macro_rules! start_error {
    () => {
        $crate::begin(::core::file!(), $crate::function_name!(), ::core::line!())
    };
}

/// Add the current location to the traceback in progress.
#[macro_export]
macro_rules! add_trace {
    () => {
        $crate::push_frame(::core::file!(), $crate::function_name!(), ::core::line!())
    };
}

/// Set the traceback message with `format!`-style arguments.
#[macro_export]
macro_rules! set_error_msg {
    ($($arg:tt)+) => {
        $crate::set_message(::core::format_args!($($arg)+))
    };
}

/// Fail the enclosing function: optionally set the message, start the
/// traceback here, and return `Err(code)`.
///
/// `code` is anything convertible into [`ErrorCode`](crate::ErrorCode); the
/// returned error goes through `From` into the function's error type.
#[macro_export]
macro_rules! fail {
    ($code:expr $(,)?) => {{
        $crate::start_error!();
        return ::core::result::Result::Err(::core::convert::From::from(
            <$crate::ErrorCode as ::core::convert::From<_>>::from($code),
        ));
    }};
    ($code:expr, $($arg:tt)+) => {{
        $crate::set_error_msg!($($arg)+);
        $crate::start_error!();
        return ::core::result::Result::Err(::core::convert::From::from(
            <$crate::ErrorCode as ::core::convert::From<_>>::from($code),
        ));
    }};
}

/// Unwrap a `Result`, or add the current location to the traceback and
/// return its error from the enclosing function.
///
/// The traced counterpart of `?`.
#[macro_export]
macro_rules! check {
    ($expr:expr $(,)?) => {
        match $expr {
            ::core::result::Result::Ok(value) => value,
            ::core::result::Result::Err(err) => {
                $crate::add_trace!();
                return ::core::result::Result::Err(::core::convert::From::from(err));
            }
        }
    };
}

/// Check a raw return code: anything but [`ErrorCode::OK`](crate::ErrorCode::OK)
/// adds the current location to the traceback and is returned as `Err`.
#[macro_export]
macro_rules! check_code {
    ($expr:expr $(,)?) => {{
        let code = <$crate::ErrorCode as ::core::convert::From<_>>::from($expr);
        if code.is_err() {
            $crate::add_trace!();
            return ::core::result::Result::Err(::core::convert::From::from(code));
        }
    }};
}

#[cfg(test)]
mod tests {
    use crate::ErrorCode;

    fn named_function() -> &'static str {
        function_name!()
    }

    #[test]
    fn function_name_is_enclosing_path() {
        let name = named_function();
        assert!(name.ends_with("macros::tests::named_function"), "{name}");
    }

    #[test]
    fn function_name_strips_closures() {
        let name = (|| function_name!())();
        assert!(
            name.ends_with("macros::tests::function_name_strips_closures"),
            "{name}"
        );
    }

    fn leaf(code: i32) -> Result<u32, ErrorCode> {
        if code != 0 {
            fail!(code, "leaf failed with {}", code);
        }
        Ok(7)
    }

    fn middle(code: i32) -> Result<u32, ErrorCode> {
        let value = check!(leaf(code));
        Ok(value + 1)
    }

    fn raw_call(code: i32) -> Result<(), ErrorCode> {
        check_code!(code);
        Ok(())
    }

    #[test]
    fn fail_and_check_record_frames() {
        crate::clear();
        assert_eq!(middle(0), Ok(8));
        assert_eq!(crate::depth(), 0);

        assert_eq!(middle(5), Err(ErrorCode::new(5)));
        let functions = crate::with_frames(|frames| {
            frames.iter().map(|f| f.function).collect::<Vec<_>>()
        })
        .unwrap();
        assert_eq!(functions.len(), 2);
        assert!(functions[0].ends_with("::leaf"));
        assert!(functions[1].ends_with("::middle"));
        assert_eq!(
            crate::with_message(|m| m.to_owned()).unwrap(),
            "leaf failed with 5"
        );
        crate::clear();
    }

    #[test]
    fn check_code_passes_ok_through() {
        crate::clear();
        assert_eq!(raw_call(0), Ok(()));
        assert_eq!(crate::depth(), 0);
        assert_eq!(raw_call(-1), Err(ErrorCode::new(-1)));
        assert_eq!(crate::depth(), 1);
        crate::with_frames(|frames| assert!(frames[0].file.ends_with("macros.rs")));
        crate::clear();
    }
}
