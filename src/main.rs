//! CLI entry point for the sharegate tool.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

mod app;
mod app_config;
mod cli;

use cli::Args;

/// Process outcome, mapped onto the exit code.
///
/// Exit code 2 is left to clap for usage errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    Success,
    Failure,
    /// The share does not exist or can no longer be downloaded.
    Unavailable,
    /// The share needs a password and none was accepted.
    PasswordRejected,
}

impl ProcessExit {
    pub(crate) fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Unavailable => 3,
            Self::PasswordRejected => 4,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let exit = app::runtime::run_sharegate(args).await?;
    Ok(ExitCode::from(exit.code()))
}
