//! # Tracy CLI
//!
//! Library half of the `tracy` binary. Each subcommand is a function that
//! writes to a caller-supplied sink so it can be exercised from tests.
//!
//! - [`config`] - optional `tracy.toml` with the `[shared]` table
//! - [`demo`] - an instrumented call chain that fails on purpose
//! - [`scenario`] - replay of a traceback described in TOML
//! - [`decode`] - error code descriptions

pub mod config;
pub mod decode;
pub mod demo;
pub mod error;
pub mod scenario;

pub use error::{CliError, CliResult};
