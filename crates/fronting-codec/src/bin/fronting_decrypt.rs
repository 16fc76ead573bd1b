//! Diagnostic CLI for fronting portal payloads.
//!
//! This binary delegates to `fronting_codec::cli` for the actual work, keeping
//! the behaviour testable without spawning a process.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use fronting_codec::CodecSettings;
use fronting_codec::cli::{Cli, run};
use ortho_config::OrthoConfig as _;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    // CLI flags are handled by `Cli`; settings only come from env and files.
    let settings = match CodecSettings::load_from_iter([OsString::from("fronting-decrypt")]) {
        Ok(settings) => settings,
        Err(err) => return fail(&err),
    };

    match run(&cli, &settings) {
        Ok(output) => {
            if let Err(err) = writeln!(io::stdout().lock(), "{output}") {
                drop(err);
            }
            ExitCode::SUCCESS
        }
        Err(err) => fail(&err),
    }
}

fn fail(err: &dyn std::fmt::Display) -> ExitCode {
    if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
        drop(write_err);
    }
    ExitCode::FAILURE
}
