//! `tracy replay`: render a traceback described in a TOML file.
//!
//! ```toml
//! code = 28
//! message = "writing journal segment 4"
//!
//! [[frames]]
//! file = "journal.c"
//! function = "journal_append"
//! line = 212
//!
//! [[codes]]
//! code = 28
//! text = "journal volume full"
//! ```
//!
//! Frames are listed innermost first, the order they are rendered in. They
//! are pushed in reverse so the rendered traceback matches the file. The
//! optional `codes` table overrides descriptions and falls back to the OS
//! decoder for anything it does not list.

use serde::Deserialize;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};
use tracy::{CodeTable, ErrorCode, OS_DECODER};
use tracy_common::config::ConfigLoader;
use tracy_common::consts::MAX_STACK_SIZE;

use crate::error::{CliError, CliResult};

/// One recorded call site.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameSpec {
    pub file: String,
    pub function: String,
    pub line: u32,
}

/// A custom description for one code.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodeSpec {
    pub code: i32,
    pub text: String,
}

/// A traceback to replay.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Code the traceback is rendered for.
    pub code: i32,
    /// Message set at the failure site.
    #[serde(default)]
    pub message: Option<String>,
    /// Frames, innermost first.
    #[serde(default)]
    pub frames: Vec<FrameSpec>,
    /// Description overrides.
    #[serde(default)]
    pub codes: Vec<CodeSpec>,
}

impl Scenario {
    /// Check that the scenario describes a renderable failure.
    pub fn validate(&self) -> CliResult<()> {
        if self.code == 0 {
            return Err(CliError::Scenario(
                "code 0 means success and has no traceback".into(),
            ));
        }
        if self.frames.len() > MAX_STACK_SIZE {
            return Err(CliError::Scenario(format!(
                "{} frames exceed the stack capacity of {MAX_STACK_SIZE}",
                self.frames.len()
            )));
        }
        Ok(())
    }
}

/// Load and validate a scenario file.
pub fn load_scenario(path: &Path) -> CliResult<Scenario> {
    let scenario = Scenario::load(path).map_err(|source| CliError::Config {
        path: path.display().to_string(),
        source,
    })?;
    scenario.validate()?;
    debug!(
        path = %path.display(),
        frames = scenario.frames.len(),
        "Loaded scenario"
    );
    Ok(scenario)
}

fn leak(s: &str) -> &'static str {
    Box::leak(s.to_owned().into_boxed_str())
}

fn leak_code_table(codes: &[CodeSpec]) -> &'static CodeTable {
    let entries: Vec<(i32, &'static str)> =
        codes.iter().map(|spec| (spec.code, leak(&spec.text))).collect();
    let entries: &'static [(i32, &'static str)] = Box::leak(entries.into_boxed_slice());
    Box::leak(Box::new(CodeTable::new(entries).with_fallback(&OS_DECODER)))
}

/// Replay `scenario` on the calling thread and render it to `out`.
///
/// The thread's trace state is cleared before and after, and the decoder is
/// reset to the default.
pub fn replay<W: Write>(out: &mut W, scenario: &Scenario) -> CliResult<ErrorCode> {
    scenario.validate()?;

    tracy::clear();
    if !scenario.codes.is_empty() {
        tracy::set_decoder(leak_code_table(&scenario.codes));
    }

    for frame in scenario.frames.iter().rev() {
        tracy::push_frame(leak(&frame.file), leak(&frame.function), frame.line);
    }
    if let Some(message) = &scenario.message {
        tracy::set_message(format_args!("{message}"));
    }

    let code = ErrorCode::new(scenario.code);
    info!(code = scenario.code, depth = tracy::depth(), "Replaying scenario");
    tracy::render_to(&mut *out, code);

    tracy::clear();
    tracy::reset_decoder();
    out.flush()?;
    Ok(code)
}
