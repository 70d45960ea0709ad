//! Configuration lifecycle: load file config, merge CLI, resolve effective settings.

use std::path::PathBuf;

use anyhow::Result;
use sharegate_core::share::{CONNECT_TIMEOUT_SECS, DEFAULT_SERVER_URL, READ_TIMEOUT_SECS};

use crate::app_config::{FileConfig, VerbositySetting, load_default_file_config};
use crate::cli::Args;

/// Effective settings after CLI > config file > built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedConfig {
    pub(crate) server_url: String,
    pub(crate) output_dir: PathBuf,
    pub(crate) connect_timeout_secs: u64,
    pub(crate) read_timeout_secs: u64,
    pub(crate) progress: bool,
    pub(crate) log_level: &'static str,
    pub(crate) config_path: Option<PathBuf>,
}

/// Loads the default config file (if any) and merges it under the CLI flags.
pub(crate) fn resolve_config(args: &Args) -> Result<ResolvedConfig> {
    let loaded = load_default_file_config()?;
    let mut resolved = merge_config(args, loaded.config.as_ref());
    if loaded.config.is_some() {
        resolved.config_path = loaded.path;
    }
    Ok(resolved)
}

pub(crate) fn merge_config(args: &Args, file_config: Option<&FileConfig>) -> ResolvedConfig {
    let file = file_config.cloned().unwrap_or_default();

    let server_url = args
        .server
        .clone()
        .or(file.server_url)
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    let output_dir = args
        .output_dir
        .clone()
        .or(file.output_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    ResolvedConfig {
        server_url,
        output_dir,
        connect_timeout_secs: file.connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS),
        read_timeout_secs: file.read_timeout_secs.unwrap_or(READ_TIMEOUT_SECS),
        progress: !args.no_progress && file.progress.unwrap_or(true),
        log_level: resolve_default_log_level(args, file.verbosity),
        config_path: None,
    }
}

/// CLI flags win over the config file's verbosity; `RUST_LOG` wins over both.
pub(crate) fn resolve_default_log_level(
    args: &Args,
    file_verbosity: Option<VerbositySetting>,
) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => {}
        1 => return "debug",
        _ => return "trace",
    }
    match file_verbosity.unwrap_or(VerbositySetting::Default) {
        VerbositySetting::Default => "info",
        VerbositySetting::Verbose => "debug",
        VerbositySetting::Quiet => "error",
        VerbositySetting::Debug => "trace",
    }
}
