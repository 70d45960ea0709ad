//! CLI argument definitions using clap derive macros.

use std::fmt;
use std::path::PathBuf;

use clap::Parser;

/// Look up a file share and download it.
///
/// Prints what the share holds, asks for the password when the share is
/// protected, then saves the file into the output directory.
#[derive(Parser)]
#[command(name = "sharegate")]
#[command(author, version, about)]
#[command(after_help = "Exit codes:\n  0  success\n  1  error\n  2  invalid arguments\n  3  share not found or no longer available\n  4  password rejected or not provided")]
pub struct Args {
    /// Share identifier (the last segment of a share link)
    pub slug: String,

    /// Share server base URL [default: http://localhost:8080]
    #[arg(short, long, value_name = "URL")]
    pub server: Option<String>,

    /// Password for protected shares (prompted for when omitted)
    #[arg(short, long)]
    pub password: Option<String>,

    /// Directory to save the file into [default: current directory]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Only show share details; do not download
    #[arg(long)]
    pub info: bool,

    /// Disable the download progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("slug", &self.slug)
            .field("server", &self.server)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("output_dir", &self.output_dir)
            .field("info", &self.info)
            .field("no_progress", &self.no_progress)
            .field("verbose", &self.verbose)
            .field("quiet", &self.quiet)
            .finish()
    }
}
