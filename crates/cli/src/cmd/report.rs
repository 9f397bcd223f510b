use std::path::PathBuf;

use anyhow::{Context, Result};
use argp::FromArgs;
use serde::Serialize;
use time::OffsetDateTime;
use verdigris_core::{
    aggregate,
    config::Config,
    freshness::{self, Freshness},
    models::{FreshnessSummary, ScanOptions},
};
use verdigris_github::Scanner;

use crate::{output, templates};

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Generate a standalone HTML report: summary cards, distribution chart,
/// and a filterable table of all repositories.
#[argp(subcommand, name = "report")]
pub struct Args {
    #[argp(positional)]
    /// organization to report on
    organization: String,
    #[argp(option, short = 'o', default = "PathBuf::from(\"verdigris-report.html\")")]
    /// output file path
    output: PathBuf,
    #[argp(switch, short = 'r')]
    /// force a fresh fetch from GitHub
    refresh: bool,
}

#[derive(Serialize)]
struct ReportContext {
    organization: String,
    generated_at: String,
    summary: FreshnessSummary,
    repositories: Vec<RepoRow>,
    green_pct: String,
    yellow_pct: String,
    red_pct: String,
    /// Upper bound of the yellow slice in the conic gradient.
    green_yellow_pct: String,
}

#[derive(Serialize)]
struct RepoRow {
    full_name: String,
    url: String,
    age: String,
    freshness: &'static str,
}

pub async fn run(args: Args) -> Result<()> {
    let scanner =
        Scanner::from_config(&Config::from_env()).context("Failed to initialize scanner")?;

    println!("Scanning organization: {}", args.organization);
    let result = scanner.scan(&args.organization, ScanOptions { refresh: args.refresh }).await?;
    let now = OffsetDateTime::now_utc();

    if result.from_cache {
        println!("Using cached data from {}", output::timestamp(result.fetched_at));
    }

    let summary = aggregate::summarize(&result.repositories, now);
    let mut repos = result.repositories;
    aggregate::sort_by_age(&mut repos);

    let rows = repos
        .into_iter()
        .map(|repo| RepoRow {
            age: freshness::age(repo.last_updated, now),
            freshness: Freshness::classify(repo.last_updated, now).as_str(),
            full_name: repo.full_name,
            url: repo.html_url,
        })
        .collect();

    let pct = |count: usize| {
        if summary.total > 0 { count as f64 / summary.total as f64 * 100.0 } else { 0.0 }
    };
    let context = ReportContext {
        organization: result.organization,
        generated_at: output::timestamp(now),
        summary,
        repositories: rows,
        green_pct: format!("{:.1}", pct(summary.green)),
        yellow_pct: format!("{:.1}", pct(summary.yellow)),
        red_pct: format!("{:.1}", pct(summary.red)),
        green_yellow_pct: format!("{:.1}", pct(summary.green + summary.yellow)),
    };

    let html = templates::render_report(context)?;
    std::fs::write(&args.output, html)
        .with_context(|| format!("Failed to write report to {}", args.output.display()))?;
    println!("Report generated: {}", args.output.display());

    Ok(())
}
