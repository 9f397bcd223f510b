mod cmd;
mod output;
mod templates;

use std::process::ExitCode;

use argp::FromArgs;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Scan GitHub organizations for repository freshness.
///
/// Repositories are classified by how recently they were pushed to:
/// green (within 2 months), yellow (2-6 months), red (over 6 months).
/// Repository data is cached for 30 days; use --refresh to force a fetch.
///
/// Set GITHUB_TOKEN for direct API access, or authenticate via `gh auth login`.
struct TopLevel {
    #[argp(subcommand)]
    command: Command,
}

#[derive(FromArgs, PartialEq, Eq, Debug)]
#[argp(subcommand)]
enum Command {
    Scan(cmd::scan::Args),
    List(cmd::list::Args),
    Report(cmd::report::Args),
    Cache(cmd::cache::Args),
}

#[tokio::main]
async fn main() -> ExitCode {
    let env_filter = EnvFilter::builder()
        // Default to warnings only; this is an interactive tool
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_filter(env_filter))
        .init();

    let args: TopLevel = argp::parse_args_or_exit(argp::DEFAULT);
    let result = match args.command {
        Command::Scan(args) => cmd::scan::run(args).await,
        Command::List(args) => cmd::list::run(args).await,
        Command::Report(args) => cmd::report::run(args).await,
        Command::Cache(args) => cmd::cache::run(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
