use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

use version_gate::artifact::ArtifactFile;
use version_gate::cli::{handle_event, EventOutcome};
use version_gate::config::{self, Config};
use version_gate::domain::{classify, PullRequestEvent};
use version_gate::git::{Git2Repository, Repository};
use version_gate::{outputs, telemetry, ui, VersionGateError};

#[derive(Parser)]
#[command(
    name = "version-gate",
    version,
    about = "Gate pull requests on a version increment label and apply it on merge"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    json: bool,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Handle one pull request event (gate on label changes, apply on merge)
    Run {
        #[arg(long, env = "GITHUB_EVENT_PATH", help = "Pull request event payload (JSON)")]
        event: PathBuf,

        #[arg(long, default_value = ".", help = "Repository to apply the increment in")]
        repo: PathBuf,

        #[arg(long, help = "Compute the increment without writing, committing or pushing")]
        dry_run: bool,
    },

    /// Print the increment a set of labels resolves to
    Classify {
        #[arg(help = "Pull request labels")]
        labels: Vec<String>,
    },

    /// Print the current version from the artifact file
    Show {
        #[arg(long, default_value = ".", help = "Repository holding the artifact")]
        repo: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    telemetry::init_tracing(args.json, level);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Command::Run {
            event,
            repo,
            dry_run,
        } => run(&config, &event, repo, dry_run),
        Command::Classify { labels } => {
            println!("{}", classify(&labels));
            Ok(())
        }
        Command::Show { repo } => show(&config, repo),
    };

    if let Err(e) = result {
        // A failing gate verdict has already been printed
        if !matches!(e, VersionGateError::PolicyViolation(_)) {
            ui::display_error(&e.to_string());
        }
        if e.is_conflict() {
            ui::display_status(
                "Another run updated the branch first. Re-run this job or bump the version manually.",
            );
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run(
    config: &Config,
    event_path: &std::path::Path,
    repo_path: PathBuf,
    dry_run: bool,
) -> version_gate::Result<()> {
    let event = PullRequestEvent::from_file(event_path)?;

    let result = handle_event(&event, config, dry_run, || Git2Repository::open(&repo_path))?;

    for warning in &result.warnings {
        ui::display_policy_warning(warning);
    }

    match result.outcome {
        EventOutcome::Gate(verdict) => {
            ui::display_gate_verdict(event.number, &verdict);
            if let Some(diagnostic) = verdict.diagnostic() {
                return Err(VersionGateError::policy(diagnostic));
            }
        }
        EventOutcome::Applied(report) => {
            ui::display_apply_report(&report);
            if let Some(path) = std::env::var_os(outputs::GITHUB_OUTPUT_ENV) {
                outputs::write_outputs(
                    std::path::Path::new(&path),
                    &outputs::apply_outputs(&report),
                )?;
            }
        }
        EventOutcome::Ignored(warning) => ui::display_status(&warning.to_string()),
    }

    Ok(())
}

fn show(config: &Config, repo_path: PathBuf) -> version_gate::Result<()> {
    let workdir = match Git2Repository::open(&repo_path) {
        Ok(repo) => repo.workdir()?,
        Err(_) => repo_path,
    };
    let version = ArtifactFile::in_workdir(&workdir, &config.artifact.path)?.load()?;
    ui::display_version(&version);
    Ok(())
}
