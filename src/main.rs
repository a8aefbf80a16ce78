use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use calendar_resource::backend::Backend;
use calendar_resource::commands::{self, read_request, write_response};
use calendar_resource::logging;
use calendar_resource::settings::Settings;
use calendar_resource_core::SystemClock;
use calendar_resource_core::protocol::{CheckRequest, InRequest, OutRequest, Source};
use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser)]
#[command(name = "calendar-resource")]
#[command(about = "Pipeline resource whose versions are the calendar events happening now")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the versions that exist right now
    Check,
    /// Fetch one version's metadata
    In {
        /// Directory to write the `input` file into (created if absent)
        target: PathBuf,
    },
    /// Create a new calendar event
    Out {
        /// Build sources directory
        sources: PathBuf,
    },
}

const VERBS: [&str; 3] = ["check", "in", "out"];

/// Installed as `/opt/resource/{check,in,out}`, the verb is the program name.
fn with_verb_from_program_name(mut args: Vec<OsString>) -> Vec<OsString> {
    let verb = args
        .first()
        .and_then(|program| Path::new(program).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| VERBS.contains(name))
        .map(OsString::from);

    if let Some(verb) = verb {
        args.insert(1, verb);
    }
    args
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(with_verb_from_program_name(std::env::args_os().collect()));

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    let settings = Settings::load().context("loading runtime settings")?;
    logging::init(&settings.log);

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();

    match command {
        Commands::Check => {
            let request: CheckRequest =
                read_request(stdin).context("reading request from standard input")?;
            let backend = backend(&request.source, &settings)?;
            let versions = commands::check::run(&request, &backend, &SystemClock)
                .await
                .context("checking for current events")?;
            write_response(stdout, &versions).context("writing response to standard output")?;
        }
        Commands::In { target } => {
            let request: InRequest =
                read_request(stdin).context("reading request from standard input")?;
            let backend = backend(&request.source, &settings)?;
            let response = commands::get::run(&request, &target, &backend)
                .await
                .context("fetching event")?;
            write_response(stdout, &response).context("writing response to standard output")?;
        }
        Commands::Out { sources } => {
            let request: OutRequest =
                read_request(stdin).context("reading request from standard input")?;
            let backend = backend(&request.source, &settings)?;
            let response = commands::put::run(&request, &sources, &backend)
                .await
                .context("creating event")?;
            write_response(stdout, &response).context("writing response to standard output")?;
        }
    }

    Ok(())
}

fn backend(source: &Source, settings: &Settings) -> Result<Backend> {
    debug!(provider = %source.provider, "selecting backend");
    Backend::from_source(source, settings).context("configuring calendar provider")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_verb_from_program_name() {
        let argv = with_verb_from_program_name(args(&["/opt/resource/in", "/tmp/build/get"]));
        assert_eq!(argv, args(&["/opt/resource/in", "in", "/tmp/build/get"]));

        let cli = Cli::parse_from(argv);
        assert!(
            matches!(cli.command, Commands::In { ref target } if target == Path::new("/tmp/build/get"))
        );
    }

    #[test]
    fn test_explicit_subcommand() {
        let argv = with_verb_from_program_name(args(&["calendar-resource", "check"]));
        let cli = Cli::parse_from(argv);
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn test_out_requires_sources_argument() {
        let argv = with_verb_from_program_name(args(&["/opt/resource/out"]));
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
