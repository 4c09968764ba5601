//! # Tracy
//!
//! Command-line front end for the traceback recorder.
//!
//! - `tracy decode <CODE>...` prints error code descriptions to stdout.
//! - `tracy demo` runs an instrumented call chain and renders its traceback.
//! - `tracy replay <FILE>` renders a traceback described in a TOML scenario.
//!
//! Tracebacks go to stderr, the diagnostic sink.

use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracy::ErrorCode;
use tracy_cli::CliResult;
use tracy_cli::config::{CliConfig, load_cli_config};
use tracy_cli::decode::run_decode;
use tracy_cli::demo::{DemoOptions, run_demo};
use tracy_cli::scenario::{load_scenario, replay};

/// Tracy - per-thread error traceback recorder
#[derive(Parser, Debug)]
#[command(name = "tracy")]
#[command(version)]
#[command(about = "Record and render error tracebacks")]
struct Args {
    /// Path to tracy.toml (default: /etc/tracy/tracy.toml when present).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the description of each error code.
    Decode {
        #[arg(required = true, allow_negative_numbers = true)]
        codes: Vec<i32>,
    },

    /// Run an instrumented call chain that fails on purpose.
    Demo {
        /// Number of frames the chain records (at most one more than the
        /// trace stack holds).
        #[arg(long, default_value_t = 3)]
        depth: usize,

        /// Error code the chain fails with.
        #[arg(long, default_value_t = libc::EIO, allow_negative_numbers = true)]
        code: i32,

        /// Message set at the failure site.
        #[arg(long)]
        message: Option<String>,

        /// Attempt and roll back a failing lookup first.
        #[arg(long)]
        recover: bool,
    },

    /// Render a traceback described in a TOML scenario file.
    Replay {
        #[arg(value_name = "FILE")]
        scenario: PathBuf,
    },
}

fn main() {
    let args = Args::parse();
    let config = load_cli_config(args.config.as_deref());
    setup_tracing(&args, config.as_ref().ok());

    let result = config.and_then(|config| run(&args, &config));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args, config: &CliConfig) -> CliResult<()> {
    info!(
        service = %config.shared.service_name,
        log_level = config.shared.log_level.as_str(),
        "tracy v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    match &args.command {
        Command::Decode { codes } => run_decode(&mut io::stdout().lock(), codes),
        Command::Demo {
            depth,
            code,
            message,
            recover,
        } => {
            let opts = DemoOptions {
                depth: *depth,
                code: ErrorCode::new(*code),
                message: message.clone(),
                recover: *recover,
            };
            run_demo(&mut io::stderr().lock(), &opts).map(drop)
        }
        Command::Replay { scenario } => {
            let scenario = load_scenario(scenario)?;
            replay(&mut io::stderr().lock(), &scenario).map(drop)
        }
    }
}

fn setup_tracing(args: &Args, config: Option<&CliConfig>) {
    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        config.map_or(LevelFilter::INFO, |c| c.shared.log_level.into())
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .compact()
            .init();
    }
}

