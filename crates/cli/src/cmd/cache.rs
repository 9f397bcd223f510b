use anyhow::{Context, Result};
use argp::FromArgs;
use verdigris_cache::Cache;
use verdigris_core::config::Config;

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Manage the local snapshot cache.
#[argp(subcommand, name = "cache")]
pub struct Args {
    #[argp(subcommand)]
    command: Command,
}

#[derive(FromArgs, PartialEq, Eq, Debug)]
#[argp(subcommand)]
enum Command {
    Clear(ClearArgs),
    ClearAll(ClearAllArgs),
    Path(PathArgs),
}

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Delete the cached snapshot for one organization.
#[argp(subcommand, name = "clear")]
struct ClearArgs {
    #[argp(positional)]
    /// organization whose snapshot to delete
    organization: String,
}

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Delete every cached snapshot.
#[argp(subcommand, name = "clear-all")]
struct ClearAllArgs {}

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Print the cache directory path.
#[argp(subcommand, name = "path")]
struct PathArgs {}

pub fn run(args: Args) -> Result<()> {
    let config = Config::from_env();
    let cache = Cache::from_config(&config.cache).context("Failed to open cache")?;
    match args.command {
        Command::Clear(clear) => {
            cache
                .clear(&clear.organization)
                .with_context(|| format!("Failed to clear cache for {}", clear.organization))?;
            println!("Cleared cached snapshot for {}", clear.organization);
        }
        Command::ClearAll(_) => {
            cache.clear_all().context("Failed to clear cache")?;
            println!("Cleared all cached snapshots");
        }
        Command::Path(_) => println!("{}", cache.root().display()),
    }
    Ok(())
}
