use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use sharegate_core::share::metadata_lines;
use sharegate_core::{
    AttemptOutcome, ControllerEvent, ControllerState, DownloadFailure, FileSink, HttpShareApi,
    ShareAccessController, ShareSlug, describe_state,
};
use tracing::{debug, info, warn};

use crate::ProcessExit;
use crate::app::{config_manager, exit_handler, terminal};
use crate::cli::Args;

/// Password prompts before giving up on a protected share.
const MAX_PASSWORD_PROMPTS: usize = 3;

pub(crate) async fn run_sharegate(args: Args) -> Result<ProcessExit> {
    let resolved = config_manager::resolve_config(&args)?;
    terminal::init_tracing(resolved.log_level);

    debug!(?args, "CLI arguments parsed");
    if let Some(path) = &resolved.config_path {
        debug!(path = %path.display(), "Loaded config file");
    }

    let slug = ShareSlug::parse(args.slug.trim()).context("Invalid share identifier")?;
    let api = HttpShareApi::with_timeouts(
        &resolved.server_url,
        resolved.connect_timeout_secs,
        resolved.read_timeout_secs,
    )
    .context("Invalid server URL")?;
    let show_progress = terminal::progress_allowed(resolved.progress, args.quiet);
    let sink = Arc::new(FileSink::new(&resolved.output_dir).with_progress(show_progress));
    debug!(output_dir = %sink.output_dir().display(), "Saving downloads");
    let controller = ShareAccessController::new(Arc::new(api), sink.clone());
    let mut events = controller.events();

    info!(server = %resolved.server_url, slug = %slug, "Looking up share");
    controller.load(slug).await;

    let state = controller.state();
    let ControllerState::Ready { metadata } = &state else {
        report_state(&state);
        return Ok(exit_handler::determine_exit_outcome(&state));
    };
    if !args.quiet {
        for line in metadata_lines(metadata) {
            println!("{line}");
        }
    }
    if args.info {
        return Ok(ProcessExit::Success);
    }

    if let Some(password) = &args.password {
        controller.set_password_candidate(password.clone());
    }

    let mut prompts = 0;
    let mut reported = None;
    loop {
        match controller.attempt_download().await {
            AttemptOutcome::Started => break,
            AttemptOutcome::PasswordRequired
            | AttemptOutcome::Failed(DownloadFailure::WrongPassword)
                if prompts < MAX_PASSWORD_PROMPTS =>
            {
                if prompts > 0 || args.password.is_some() {
                    let state = controller.state();
                    report_state(&state);
                    reported = Some(state);
                }
                let Some(password) = prompt_password()? else {
                    warn!("No password provided");
                    break;
                };
                prompts += 1;
                controller.set_password_candidate(password);
            }
            outcome => {
                debug!(?outcome, "Download attempt finished without a transfer");
                break;
            }
        }
    }

    let state = controller.state();
    let exit = exit_handler::determine_exit_outcome(&state);
    if exit != ProcessExit::Success {
        if reported.as_ref() != Some(&state) {
            report_state(&state);
        }
        return Ok(exit);
    }

    while let Ok(ControllerEvent::DownloadStarted { file_name, .. }) = events.try_recv() {
        if !args.quiet {
            eprintln!("Downloading {file_name}...");
        }
    }

    let mut failed = false;
    for result in sink.wait().await {
        match result {
            Ok(saved) => {
                if !args.quiet {
                    println!(
                        "Saved {} ({} bytes)",
                        saved.path.display(),
                        saved.bytes_written
                    );
                }
            }
            Err(error) => {
                eprintln!("Download failed: {error}");
                failed = true;
            }
        }
    }

    Ok(if failed {
        ProcessExit::Failure
    } else {
        ProcessExit::Success
    })
}

fn report_state(state: &ControllerState) {
    let descriptor = describe_state(state);
    eprintln!(
        "{} {}: {}",
        descriptor.category.icon(),
        descriptor.category.label(),
        descriptor.what
    );
    if let Some(fix) = descriptor.fix {
        eprintln!("  {fix}");
    }
    if descriptor.category.is_retryable() {
        eprintln!("  Run the same command again to retry.");
    }
}

/// Reads a password from the terminal without echo, or one line from piped stdin.
///
/// Returns `None` when stdin is closed or the input is empty.
fn prompt_password() -> Result<Option<String>> {
    let password = if io::stdin().is_terminal() {
        dialoguer::Password::new()
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()
            .context("Failed to read password")?
    } else {
        eprint!("Password: ");
        io::stderr().flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        line.trim_end_matches(['\r', '\n']).to_string()
    };
    Ok((!password.is_empty()).then_some(password))
}
