//! Tracy Common Library
//!
//! Shared constants and configuration loading utilities for the tracy
//! workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Capacity limits of the traceback recorder
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use tracy_common::consts::MAX_STACK_SIZE;
//! use tracy_common::config::{ConfigLoader, SharedConfig};
//! ```

pub mod config;
pub mod consts;
pub mod prelude;
