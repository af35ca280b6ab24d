use anyhow::Context;
use clap::Parser;
use migration_numbering::config::{DIRNAME_ENV, REGEX_ENV};
use migration_numbering::utils::resolve_path;
use migration_numbering::{
    renumber_migrations, GitHistory, HistoryLookup, NoHistory, NumberingConfig, DEFAULT_DIRNAME,
    DEFAULT_REGEX,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Exit status for failures, kept apart from the 0/1 "files changed" signal.
const FATAL_EXIT: u8 = 2;

/// Renumber migration files so their numeric prefixes stay contiguous
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Changed files, as passed by the hook runner
    files: Vec<PathBuf>,

    /// Directory name that marks a migration directory
    #[arg(long, env = DIRNAME_ENV, default_value = DEFAULT_DIRNAME)]
    dirname: String,

    /// Filename pattern with two groups: the number and the rest of the name
    #[arg(long, env = REGEX_ENV, default_value = DEFAULT_REGEX)]
    regex: String,

    /// Print every parsing, ordering and rename decision
    #[arg(short, long)]
    verbose: bool,

    /// Print the performed renames as JSON
    #[arg(long)]
    json: bool,

    /// Do not query git history; colliding files are ordered by name
    #[arg(long)]
    no_history: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(args.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::from(FATAL_EXIT);
    }

    match run(args).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(FATAL_EXIT)
        }
    }
}

fn init_logging(verbose: bool) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let builder = FmtSubscriber::builder()
        .with_writer(std::io::stdout)
        .with_target(false);

    // RUST_LOG wins over the verbosity flag when set
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        let subscriber = builder.with_env_filter(EnvFilter::from_default_env()).finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let level = if verbose { Level::DEBUG } else { Level::WARN };
        let subscriber = builder.with_max_level(level).finish();
        tracing::subscriber::set_global_default(subscriber)
    }
}

async fn run(args: Args) -> anyhow::Result<u8> {
    let config =
        NumberingConfig::new(&args.dirname, &args.regex).context("Invalid configuration")?;

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let paths: Vec<PathBuf> = args
        .files
        .iter()
        .map(|path| resolve_path(path, &cwd))
        .collect();

    info!(
        files = paths.len(),
        dirname = %config.dirname,
        regex = %config.pattern.as_str(),
        "Checking migration numbering"
    );

    let history: Box<dyn HistoryLookup> = if args.no_history {
        Box::new(NoHistory)
    } else {
        Box::new(GitHistory::new())
    };

    let outcome = renumber_migrations(&paths, &config, history.as_ref())
        .await
        .context("Failed to renumber migrations")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    info!(
        directories = outcome.directories.len(),
        renamed = outcome.renames.len(),
        "Done"
    );

    Ok(outcome.exit_code())
}
