//! CLI entrypoint for agent-council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{CouncilInput, RunCouncilUseCase};
use council_domain::Task;
use council_infrastructure::{ConfigLoader, FileConfig, JsonlTranscriptLogger, RoutingGateway};
use council_presentation::{
    Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit code for a run interrupted with Ctrl-C
const EXIT_CANCELLED: u8 = 130;

/// Install the tracing subscriber; the guard must outlive the run
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow::anyhow!("failed to load configuration: {}", e))?
    };

    if let Some(secs) = cli.timeout {
        config.council.timeout_seconds = secs;
    }

    let problems = config.validate();
    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("config error: {}", problem);
        }
        bail!(
            "configuration has {} problem(s); run with --show-config to see which files were read",
            problems.len()
        );
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;
    ConsoleFormatter::set_color(config.output.color);

    let Some(task) = cli.task.clone() else {
        bail!("A task is required. Example: agent-council \"Brainstorm names for a CLI\"");
    };
    let task = Task::new(task)?;

    info!("Starting agent-council");

    // === Dependency Injection ===
    let gateway = Arc::new(RoutingGateway::from_config(&config.providers));
    let cancellation = CancellationToken::new();
    let mut use_case = RunCouncilUseCase::new(gateway, config.council_config())
        .with_cancellation(cancellation.clone());

    if let Some(dir) = &config.logging.transcript_dir {
        match JsonlTranscriptLogger::create_in(dir) {
            Some(logger) => {
                info!("Writing run transcript to {}", logger.path().display());
                use_case = use_case.with_conversation_logger(Arc::new(logger));
            }
            None => warn!("Transcript logging disabled: cannot write to {}", dir.display()),
        }
    }

    let format = cli.output_format(config.output.format);
    let mut input = CouncilInput::new(task).with_verbose(cli.wants_transcript(format));
    if let Some(mode) = cli.mode {
        input = input.with_mode(mode.into());
    }

    let interrupt = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling run");
            interrupt.cancel();
        }
    });

    let result = if cli.quiet {
        use_case.execute(input).await
    } else if std::io::stderr().is_terminal() {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await
    } else {
        use_case.execute_with_progress(input, &SimpleProgress).await
    };

    match result {
        Ok(outcome) => {
            let output = ConsoleFormatter.render(&outcome, format);
            println!("{}", output.trim_end());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprint!("{}", ConsoleFormatter::format_failure(&e));
            if e.is_cancelled() {
                Ok(ExitCode::from(EXIT_CANCELLED))
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
