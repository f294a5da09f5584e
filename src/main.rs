mod builder;
mod cli;
mod error;
mod extract;
mod natural;
mod output;
mod playlist;
mod probe;
mod resolver;
mod scan;

use crate::builder::{Outcome, PlaylistBuilder, ProgressEvent, RunReport};
use crate::cli::Cli;
use crate::error::PlaylistError;
use crate::extract::MetadataExtractor;
use crate::probe::Ffprobe;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    match real_main() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn real_main() -> Result<i32, PlaylistError> {
    let cli = Cli::parse();
    cli.validate().map_err(PlaylistError::InvalidArg)?;

    let resolver = resolver::detect(cli.ffprobe.clone(), cli.bundle_dir.clone());
    if let Some(warning) = resolver::startup_check(resolver.as_ref()) {
        warn!("{warning}");
        eprintln!("warning: {warning}");
    }

    let probe = Ffprobe::from_resolver(resolver.as_ref(), cli.timeout());
    info!(probe = %probe.program().display(), dir = %cli.directory.display(), "starting run");
    let builder = PlaylistBuilder::new(MetadataExtractor::new(probe));

    let progress_to_stdout = cli.output == "text" && !cli.dry_run;
    let on_event = |event: &ProgressEvent| {
        if progress_to_stdout {
            println!("{event}");
        } else {
            eprintln!("{event}");
        }
    };

    let report = if cli.dry_run {
        let outcome = builder.build(&cli.directory, on_event)?;
        if let Outcome::Ready { playlist, .. } = &outcome {
            println!("{}", playlist.to_json()?);
        }
        let report = RunReport {
            directory: cli.directory.clone(),
            outcome,
            manifest_path: None,
        };
        if !matches!(report.outcome, Outcome::Ready { .. }) {
            output::print_report(&cli.output, &report)?;
        }
        report
    } else {
        let report = builder.generate(&cli.directory, on_event)?;
        output::print_report(&cli.output, &report)?;
        report
    };

    Ok(output::exit_code(&report.outcome))
}
