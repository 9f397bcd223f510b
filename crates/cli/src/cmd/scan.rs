use anyhow::{Context, Result};
use argp::FromArgs;
use time::OffsetDateTime;
use verdigris_core::{aggregate, config::Config, models::ScanOptions};
use verdigris_github::Scanner;

use crate::output;

const TOP_STALE_COUNT: usize = 10;

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Scan an organization and show a freshness summary plus the most stale
/// repositories.
#[argp(subcommand, name = "scan")]
pub struct Args {
    #[argp(positional)]
    /// organization to scan
    organization: String,
    #[argp(switch, short = 'r')]
    /// force a fresh fetch from GitHub
    refresh: bool,
}

pub async fn run(args: Args) -> Result<()> {
    let scanner =
        Scanner::from_config(&Config::from_env()).context("Failed to initialize scanner")?;

    println!("Scanning organization: {}", args.organization);
    if args.refresh {
        println!("(forcing refresh from GitHub)");
    }
    println!();

    let result = scanner.scan(&args.organization, ScanOptions { refresh: args.refresh }).await?;
    let now = OffsetDateTime::now_utc();

    if result.from_cache {
        println!("Using cached data from {}\n", output::timestamp(result.fetched_at));
    }

    output::print_summary(&aggregate::summarize(&result.repositories, now));
    println!();

    let top_stale = aggregate::top_stale(&result.repositories, TOP_STALE_COUNT);
    if top_stale.is_empty() {
        println!("No repositories found.");
        return Ok(());
    }
    println!("Top {} Most Stale Repositories", top_stale.len());
    println!("==============================");
    println!();
    output::print_repositories(&top_stale, now, true);

    Ok(())
}
