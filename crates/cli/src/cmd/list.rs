use anyhow::{Context, Result};
use argp::FromArgs;
use time::OffsetDateTime;
use verdigris_core::{aggregate, config::Config, freshness::Freshness, models::ScanOptions};
use verdigris_github::Scanner;

use crate::output;

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// List an organization's repositories with their age and freshness,
/// oldest first. Filter with --freshness green|yellow|red.
#[argp(subcommand, name = "list")]
pub struct Args {
    #[argp(positional)]
    /// organization to list
    organization: String,
    #[argp(option, short = 'f')]
    /// only show repositories at this freshness level
    freshness: Option<String>,
    #[argp(switch, short = 'r')]
    /// force a fresh fetch from GitHub
    refresh: bool,
}

pub async fn run(args: Args) -> Result<()> {
    // Reject a bad filter before any cache or network work
    let filter = args
        .freshness
        .as_deref()
        .map(|s| s.parse::<Freshness>())
        .transpose()?;

    let scanner =
        Scanner::from_config(&Config::from_env()).context("Failed to initialize scanner")?;
    let result = scanner.scan(&args.organization, ScanOptions { refresh: args.refresh }).await?;
    let now = OffsetDateTime::now_utc();

    let mut repos = match filter {
        Some(freshness) => aggregate::filter_by_freshness(&result.repositories, freshness, now),
        None => result.repositories,
    };
    aggregate::sort_by_age(&mut repos);

    if result.from_cache {
        println!("Using cached data from {}\n", output::timestamp(result.fetched_at));
    }
    match filter {
        Some(freshness) => {
            println!("Repositories in {} ({}): {}\n", args.organization, freshness, repos.len());
        }
        None => println!("All repositories in {}: {}\n", args.organization, repos.len()),
    }

    if repos.is_empty() {
        println!("No repositories found matching the criteria.");
        return Ok(());
    }
    output::print_repositories(&repos, now, false);

    Ok(())
}
